use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const ACCURACY: &str = "Accuracy";
pub const MACRO_F1: &str = "Macro-F1";
pub const RMSE: &str = "RMSE";
pub const R2: &str = "R^2";

/// Kind of supervised task a model solves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskType {
    Classification,
    Regression,
}

impl TaskType {
    /// Names of the two headline metrics reported for this task.
    pub fn metric_names(self) -> [&'static str; 2] {
        match self {
            TaskType::Classification => [ACCURACY, MACRO_F1],
            TaskType::Regression => [RMSE, R2],
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskType::Classification => write!(f, "Classification"),
            TaskType::Regression => write!(f, "Regression"),
        }
    }
}

/// Named scalar results of one `score` call, tagged with the task type.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsBundle {
    model_name: String,
    task: TaskType,
    metrics: BTreeMap<String, f64>,
}

impl MetricsBundle {
    pub fn new(model_name: impl Into<String>, task: TaskType) -> Self {
        MetricsBundle {
            model_name: model_name.into(),
            task,
            metrics: BTreeMap::new(),
        }
    }

    pub fn add_metric(&mut self, name: impl Into<String>, value: f64) {
        self.metrics.insert(name.into(), value);
    }

    /// Value of a metric, or `NaN` if it was never computed.
    pub fn get_metric(&self, name: &str) -> f64 {
        self.metrics.get(name).copied().unwrap_or(f64::NAN)
    }

    pub fn has_metric(&self, name: &str) -> bool {
        self.metrics.contains_key(name)
    }

    pub fn task_type(&self) -> TaskType {
        self.task
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.metrics.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl fmt::Display for MetricsBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model: {}", self.model_name)?;
        writeln!(f, "Task: {}", self.task)?;
        for name in self.task.metric_names() {
            if self.has_metric(name) {
                writeln!(f, "{}: {:.4}", name, self.get_metric(name))?;
            }
        }
        Ok(())
    }
}
