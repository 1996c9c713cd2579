use std::collections::HashMap;
use std::fs;
use std::path::Path;

use derive_traits::RingParameters;
use log::debug;
use serde_yaml::Mapping;
use serde_yaml::Value;

use super::ParameterError;

/// A value that replaces (part of) a section of the parameter file,
/// usually given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Override {
    pub section: String,
    pub keys: Vec<String>,
    pub value: Value,
}

impl Override {
    /// Parses `section.key1.key2=value`. The value is read as YAML.
    pub fn parse(s: &str) -> Result<Self, ParameterError> {
        let invalid = || ParameterError::InvalidOverride(s.to_owned());
        let (path, value) = s.split_once('=').ok_or_else(invalid)?;
        let mut parts = path.trim().split('.').map(str::to_owned);
        let section = parts.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
        let keys: Vec<String> = parts.collect();
        if keys.iter().any(|key| key.is_empty()) {
            return Err(invalid());
        }
        let value = serde_yaml::from_str(value.trim()).map_err(|_| invalid())?;
        Ok(Self {
            section,
            keys,
            value,
        })
    }
}

pub struct ParameterFileContents {
    sections: HashMap<String, Value>,
    overrides: Vec<Override>,
}

fn insert_overrides(value: &mut Value, overrides: &[Override]) {
    for o in overrides.iter() {
        set_sublevel_value_by_keys(value, &o.keys, o.value.clone());
    }
}

fn deserialize_section<T: RingParameters>(
    section_name: &str,
    value: Value,
) -> Result<T, ParameterError> {
    serde_yaml::from_value::<T>(value).map_err(|source| ParameterError::Section {
        section: section_name.to_owned(),
        source,
    })
}

fn extract_from_default<T: RingParameters>(overrides: &[Override]) -> Result<T, ParameterError> {
    let section_name = T::unwrap_section_name();
    debug!(
        "Parameter section missing for '{}', assuming defaults",
        section_name
    );
    let mut value = Value::Mapping(Mapping::default());
    insert_overrides(&mut value, overrides);
    deserialize_section(section_name, value)
}

fn extract_from_section<T: RingParameters>(
    overrides: &[Override],
    section_value: &mut Value,
) -> Result<T, ParameterError> {
    insert_overrides(section_value, overrides);
    deserialize_section(T::unwrap_section_name(), section_value.clone())
}

/// Constructs a map of the form
/// key1: key2: key3: ... key_n: Value
/// If keys is empty, returns value
fn construct_sub_mapping(keys: &[String], value: Value) -> Value {
    if keys.is_empty() {
        value
    } else {
        let mut map = Mapping::default();
        map.insert(
            Value::String(keys[0].clone()),
            construct_sub_mapping(&keys[1..], value),
        );
        Value::Mapping(map)
    }
}

fn set_sublevel_value_by_keys(value: &mut Value, keys: &[String], target_value: Value) {
    if keys.is_empty() {
        *value = target_value;
        return;
    }
    match value.as_mapping_mut() {
        Some(mapping) => match mapping.get_mut(&keys[0]) {
            Some(key) => set_sublevel_value_by_keys(key, &keys[1..], target_value),
            None => {
                mapping.insert(
                    Value::String(keys[0].clone()),
                    construct_sub_mapping(&keys[1..], target_value),
                );
            }
        },
        // A scalar that is overridden by a nested key is replaced by
        // the nested mapping.
        None => *value = construct_sub_mapping(keys, target_value),
    }
}

impl ParameterFileContents {
    pub fn new(contents: &str) -> Result<Self, ParameterError> {
        let value: Value = if contents.trim().is_empty() {
            Value::Null
        } else {
            serde_yaml::from_str(contents).map_err(ParameterError::Parse)?
        };
        let sections = match value {
            Value::Null => HashMap::new(),
            Value::Mapping(mapping) => mapping
                .into_iter()
                .map(|(k, v)| match k {
                    Value::String(name) => Ok((name, v)),
                    _ => Err(ParameterError::NotAMapping),
                })
                .collect::<Result<HashMap<_, _>, _>>()?,
            _ => return Err(ParameterError::NotAMapping),
        };
        Ok(Self {
            sections,
            overrides: vec![],
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ParameterError> {
        let contents = fs::read_to_string(path).map_err(|source| ParameterError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::new(&contents)
    }

    pub fn with_overrides(&mut self, overrides: Vec<Override>) {
        self.overrides = overrides;
    }

    pub fn get_section_names(&self) -> impl Iterator<Item = &String> {
        self.sections.keys()
    }

    fn get_overrides_for_section(&self, section_name: &str) -> Vec<Override> {
        self.overrides
            .iter()
            .filter(|o| o.section == section_name)
            .cloned()
            .collect()
    }

    pub fn extract_parameter_struct<T: RingParameters>(&mut self) -> Result<T, ParameterError> {
        let section_name = T::unwrap_section_name();
        let overrides_this_section = self.get_overrides_for_section(section_name);
        match self.sections.get_mut(section_name) {
            Some(section_value) => extract_from_section(&overrides_this_section, section_value),
            None => {
                let extracted = extract_from_default::<T>(&overrides_this_section)?;
                let value = serde_yaml::to_value(&extracted).map_err(|source| {
                    ParameterError::Section {
                        section: section_name.to_owned(),
                        source,
                    }
                })?;
                self.sections.insert(section_name.to_owned(), value);
                Ok(extracted)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use derive_custom::ring_parameters;

    use super::Override;
    use super::ParameterFileContents;
    use crate::parameters::ParameterError;

    #[ring_parameters("x")]
    struct X {
        a: usize,
        b: usize,
    }

    #[test]
    fn r#override() {
        let mut contents = ParameterFileContents::new("x:\n  a: 1\n  b: 2").unwrap();
        contents.with_overrides(vec![Override {
            section: "x".into(),
            keys: vec!["a".into()],
            value: 5.into(),
        }]);
        let x = contents.extract_parameter_struct::<X>().unwrap();
        assert_eq!(x.a, 5);
        assert_eq!(x.b, 2);
    }

    #[test]
    fn r#override_in_omitted_section() {
        let mut contents = ParameterFileContents::new("").unwrap();
        contents.with_overrides(vec![
            Override {
                section: "x".into(),
                keys: vec!["b".into()],
                value: 6.into(),
            },
            Override {
                section: "x".into(),
                keys: vec!["a".into()],
                value: 5.into(),
            },
        ]);
        let x = contents.extract_parameter_struct::<X>().unwrap();
        assert_eq!(x.a, 5);
        assert_eq!(x.b, 6);
        assert_eq!(contents.get_section_names().count(), 1);
    }

    #[test]
    fn r#override_omitted_field() {
        #[ring_parameters("y")]
        struct Y {
            #[serde(default)]
            a: usize,
            b: usize,
        }

        let mut contents = ParameterFileContents::new("y:\n  b: 2").unwrap();
        contents.with_overrides(vec![Override {
            section: "y".into(),
            keys: vec!["a".into()],
            value: 5.into(),
        }]);
        let y = contents.extract_parameter_struct::<Y>().unwrap();
        assert_eq!(y.a, 5);
        assert_eq!(y.b, 2);
    }

    #[test]
    fn missing_required_section_is_an_error() {
        let mut contents = ParameterFileContents::new("other: 1").unwrap();
        assert!(matches!(
            contents.extract_parameter_struct::<X>(),
            Err(ParameterError::Section { .. })
        ));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let mut contents = ParameterFileContents::new("x:\n  a: 1\n  b: 2\n  c: 3").unwrap();
        assert!(contents.extract_parameter_struct::<X>().is_err());
    }

    #[test]
    fn parse_override() {
        let o = Override::parse("ring.seed=42").unwrap();
        assert_eq!(o.section, "ring");
        assert_eq!(o.keys, vec!["seed".to_string()]);
        assert_eq!(o.value, serde_yaml::Value::from(42));
        let o = Override::parse("ring = {seed: 1}").unwrap();
        assert!(o.keys.is_empty());
        assert!(o.value.is_mapping());
        assert!(Override::parse("ring.seed").is_err());
        assert!(Override::parse("=3").is_err());
        assert!(Override::parse("ring..seed=3").is_err());
    }

    #[test]
    fn non_mapping_file_is_rejected() {
        assert!(matches!(
            ParameterFileContents::new("- 1\n- 2"),
            Err(ParameterError::NotAMapping)
        ));
    }
}
