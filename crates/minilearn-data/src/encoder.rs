use std::collections::BTreeSet;

/// Sorted distinct values of a categorical column.
fn sorted_unique<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    values
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Encode string labels as indices into their sorted distinct values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        LabelEncoder {
            classes: sorted_unique(labels),
        }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Index of `label`, or `None` if it was not seen by `fit`.
    pub fn transform(&self, label: &str) -> Option<f64> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .ok()
            .map(|i| i as f64)
    }
}

/// One indicator column per distinct value of a categorical column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OneHotEncoder {
    categories: Vec<String>,
}

impl OneHotEncoder {
    pub fn fit<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        OneHotEncoder {
            categories: sorted_unique(values),
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Output column names, `<column>_<value>` in category order.
    pub fn feature_names(&self, column: &str) -> Vec<String> {
        self.categories
            .iter()
            .map(|c| format!("{column}_{c}"))
            .collect()
    }

    /// Append the indicator columns for `value` to `out`.
    pub fn encode_into(&self, value: &str, out: &mut Vec<f64>) {
        out.extend(
            self.categories
                .iter()
                .map(|c| if c == value { 1.0 } else { 0.0 }),
        );
    }
}
