//! Simulated view state the scene steps mutate

use crate::config::ViewProperties;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Flattened `(view, property) -> value` snapshot
pub type StageSnapshot = BTreeMap<(String, String), f64>;

/// Views and their property values, shared between actions and the host
#[derive(Clone, Default)]
pub struct Stage {
    views: Arc<Mutex<BTreeMap<String, ViewProperties>>>,
}

impl Stage {
    pub fn new(views: BTreeMap<String, ViewProperties>) -> Self {
        Self {
            views: Arc::new(Mutex::new(views)),
        }
    }

    pub fn get(&self, view: &str, property: &str) -> Option<f64> {
        self.views.lock().get(view)?.get(property).copied()
    }

    /// Set a property, creating the view or property if needed
    pub fn set(&self, view: &str, property: &str, value: f64) {
        self.views
            .lock()
            .entry(view.to_string())
            .or_default()
            .insert(property.to_string(), value);
    }

    /// Overwrite every view with `views`
    pub fn restore(&self, views: &BTreeMap<String, ViewProperties>) {
        *self.views.lock() = views.clone();
    }

    pub fn snapshot(&self) -> StageSnapshot {
        self.views
            .lock()
            .iter()
            .flat_map(|(view, props)| {
                props
                    .iter()
                    .map(move |(prop, value)| ((view.clone(), prop.clone()), *value))
            })
            .collect()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (view, props) in self.views.lock().iter() {
            write!(f, "{view}:")?;
            for (prop, value) in props {
                write!(f, " {prop}={value:.2}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Properties whose value differs between two snapshots, as `(key, from, to)`
pub fn changes(before: &StageSnapshot, after: &StageSnapshot) -> Vec<((String, String), f64, f64)> {
    after
        .iter()
        .filter_map(|(key, to)| {
            let from = before.get(key).copied().unwrap_or(*to);
            (from != *to).then(|| (key.clone(), from, *to))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage() -> Stage {
        let mut views = BTreeMap::new();
        views.insert(
            "red".to_string(),
            [("rotation".to_string(), 0.0)].into_iter().collect(),
        );
        Stage::new(views)
    }

    #[test]
    fn test_set_and_get() {
        let stage = stage();
        assert_eq!(stage.get("red", "rotation"), Some(0.0));
        assert_eq!(stage.get("red", "opacity"), None);

        stage.set("red", "rotation", 90.0);
        assert_eq!(stage.get("red", "rotation"), Some(90.0));
        assert_eq!(stage.get("blue", "rotation"), None);
    }

    #[test]
    fn test_changes_between_snapshots() {
        let stage = stage();
        let before = stage.snapshot();
        stage.set("red", "rotation", 45.0);
        let after = stage.snapshot();

        let diff = changes(&before, &after);
        assert_eq!(diff.len(), 1);
        assert_eq!(diff[0].0, ("red".to_string(), "rotation".to_string()));
        assert_eq!((diff[0].1, diff[0].2), (0.0, 45.0));
    }

    #[test]
    fn test_restore() {
        let stage = stage();
        let mut initial = BTreeMap::new();
        initial.insert(
            "red".to_string(),
            [("rotation".to_string(), 0.0)].into_iter().collect(),
        );
        stage.set("red", "rotation", 10.0);
        stage.restore(&initial);
        assert_eq!(stage.get("red", "rotation"), Some(0.0));
    }
}
