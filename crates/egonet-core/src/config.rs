use serde_json::{Number, Value, json};

/// JSON-backed settings for layout, labels and canvas size.
///
/// Values are addressed by dotted paths (`layout.nodeRadius`). [`EgoConfig::default`] is seeded
/// with every known key; overrides can only replace those keys, and only with numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct EgoConfig(Value);

impl Default for EgoConfig {
    fn default() -> Self {
        Self(default_config_value())
    }
}

fn default_config_value() -> Value {
    json!({
        "canvas": {
            "width": 1000.0,
            "height": 500.0,
        },
        "layout": {
            "nodeRadius": 35.0,
            "centerNodeRadius": 40.0,
            "levelSpacing": 120.0,
            "levelBuffer": 30.0,
            "parentSpacing": 100.0,
            "siblingSpacing": 80.0,
            "siblingGap": 150.0,
            "childSpacing": 80.0,
            "spouseOffset": 80.0,
            "barOffset": 50.0,
        },
        "label": {
            "maxCharsPerLine": 12,
            "maxLines": 2,
        },
    })
}

impl EgoConfig {
    /// Parses a JSON document and applies it onto the defaults.
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        let overrides: Value = serde_json::from_str(text)?;
        let mut cfg = Self::default();
        cfg.apply_overrides(&overrides);
        Ok(cfg)
    }

    /// Copies every numeric `section.key` from `overrides` whose key already exists.
    pub fn apply_overrides(&mut self, overrides: &Value) {
        let Some(sections) = self.0.as_object_mut() else {
            return;
        };
        for (section, keys) in sections.iter_mut() {
            let (Some(keys), Some(incoming)) = (keys.as_object_mut(), overrides.get(section)) else {
                continue;
            };
            for (key, slot) in keys.iter_mut() {
                match incoming.get(key) {
                    Some(v @ Value::Number(_)) => *slot = v.clone(),
                    Some(other) => {
                        tracing::warn!(
                            section = %section,
                            key = %key,
                            value = %other,
                            "ignoring non-numeric config value"
                        );
                    }
                    None => {}
                }
            }
        }
    }

    /// Replaces one known numeric value. Returns `false` for unknown paths, whole sections and
    /// non-finite values.
    pub fn set_f64(&mut self, dotted_path: &str, value: f64) -> bool {
        let Some(number) = Number::from_f64(value) else {
            return false;
        };
        match self.get_mut(dotted_path) {
            Some(slot @ Value::Number(_)) => {
                *slot = Value::Number(number);
                true
            }
            _ => false,
        }
    }

    fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    fn get_mut(&mut self, dotted_path: &str) -> Option<&mut Value> {
        let mut cur = &mut self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object_mut()?.get_mut(segment)?;
        }
        Some(cur)
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.get(dotted_path)?.as_f64()
    }

    pub fn get_usize(&self, dotted_path: &str) -> Option<usize> {
        let v = self.get(dotted_path)?;
        v.as_u64()
            .or_else(|| v.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|n| usize::try_from(n).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_layout_constants() {
        let cfg = EgoConfig::default();
        assert_eq!(cfg.get_f64("layout.nodeRadius"), Some(35.0));
        assert_eq!(cfg.get_f64("layout.centerNodeRadius"), Some(40.0));
        assert_eq!(cfg.get_usize("label.maxCharsPerLine"), Some(12));
        assert_eq!(cfg.get_f64("canvas.width"), Some(1000.0));
    }

    #[test]
    fn overrides_keep_sibling_keys() {
        let cfg = EgoConfig::from_json_str(r#"{"layout":{"nodeRadius":20}}"#).unwrap();
        assert_eq!(cfg.get_f64("layout.nodeRadius"), Some(20.0));
        assert_eq!(cfg.get_f64("layout.levelSpacing"), Some(120.0));
    }

    #[test]
    fn unknown_and_non_numeric_overrides_are_ignored() {
        let cfg = EgoConfig::from_json_str(
            r#"{"layout":{"nodeRadius":"big","extra":5},"theme":{"dark":true},"canvas":7}"#,
        )
        .unwrap();
        assert_eq!(cfg, EgoConfig::default());
        assert_eq!(cfg.get_f64("layout.extra"), None);

        let cfg = EgoConfig::from_json_str("[1, 2]").unwrap();
        assert_eq!(cfg, EgoConfig::default());
    }

    #[test]
    fn set_f64_only_replaces_known_keys() {
        let mut cfg = EgoConfig::default();
        assert!(cfg.set_f64("canvas.width", 640.0));
        assert_eq!(cfg.get_f64("canvas.width"), Some(640.0));

        assert!(!cfg.set_f64("canvas.depth", 3.0));
        assert!(!cfg.set_f64("canvas", 3.0));
        assert!(!cfg.set_f64("canvas.height", f64::NAN));
        assert_eq!(cfg.get_f64("canvas.depth"), None);
        assert_eq!(cfg.get_f64("canvas.height"), Some(500.0));
    }
}
