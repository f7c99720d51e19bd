//! Parameter accumulation with conflict detection.

use serde_json::Value;

use crate::{definition::ParameterMap, error::AnalysisError};

/// Native parameters for one analysis component.
///
/// The backing map is allocated lazily on first use and keeps insertion
/// order. Setting an already-set name is a configuration error, never a
/// silent overwrite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    /// The backing map; `None` until the first parameter is set.
    map: Option<ParameterMap>,
}

impl Parameters {
    /// Sets a parameter, rejecting duplicates.
    ///
    /// Accepts strings, booleans and numbers, as well as vectors of those,
    /// which become a native ordered list value.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), AnalysisError> {
        let value = value.into();
        let map = self.map.get_or_insert_with(ParameterMap::new);
        if let Some(previous) = map.get(name) {
            return Err(AnalysisError::ParameterConflict {
                name: name.to_string(),
                previous: previous.clone(),
                new: value,
            });
        }
        map.insert(name.to_string(), value);
        Ok(())
    }

    /// Sets a parameter to an ordered list of values, rejecting duplicates.
    pub fn set_list<V>(
        &mut self,
        name: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Result<(), AnalysisError>
    where
        V: Into<Value>,
    {
        let list: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.set(name, Value::Array(list))
    }

    /// Returns the value set for a name, if any.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.map.as_ref().and_then(|map| map.get(name))
    }

    /// True when no parameter has been set.
    pub fn is_empty(&self) -> bool {
        self.map.as_ref().is_none_or(ParameterMap::is_empty)
    }

    /// Returns a copy of the accumulated map, empty if nothing was set.
    pub fn to_map(&self) -> ParameterMap {
        self.map.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_distinct_parameters_accumulate_in_order() {
        let mut parameters = Parameters::default();
        parameters.set("min_gram", 1).expect("first write");
        parameters.set("max_gram", 3).expect("distinct name");
        let map = parameters.to_map();
        let names: Vec<&String> = map.keys().collect();
        assert_eq!(names, ["min_gram", "max_gram"]);
    }

    #[test]
    fn test_conflict_reports_both_values() {
        let mut parameters = Parameters::default();
        parameters.set("language", "en").expect("first write");
        let err = parameters.set("language", "fr").unwrap_err();
        match err {
            AnalysisError::ParameterConflict {
                name,
                previous,
                new,
            } => {
                assert_eq!(name, "language");
                assert_eq!(previous, json!("en"));
                assert_eq!(new, json!("fr"));
            }
            other => panic!("unexpected error: {other}"),
        }
        // The original value survives the rejected write.
        assert_eq!(parameters.get("language"), Some(&json!("en")));
    }

    #[test]
    fn test_list_values_become_arrays() {
        let mut parameters = Parameters::default();
        parameters
            .set_list("stopwords", ["a", "the"])
            .expect("first write");
        assert_eq!(parameters.get("stopwords"), Some(&json!(["a", "the"])));
    }

    #[test]
    fn test_empty_until_first_write() {
        let mut parameters = Parameters::default();
        assert!(parameters.is_empty());
        parameters.set("flag", true).expect("first write");
        assert!(!parameters.is_empty());
    }
}
