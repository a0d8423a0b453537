use crate::projection::Projection;
use crate::window::ViewportWindower;
use serde::{Deserialize, Serialize};

/// View settings, loadable from a JSON file. Missing fields keep their
/// defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Window radius around the view center.
    pub radius: u32,
    pub projection: Projection,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            radius: ViewportWindower::DEFAULT_RADIUS,
            projection: Projection::default(),
        }
    }
}

impl ViewConfig {
    pub fn windower(&self) -> ViewportWindower {
        ViewportWindower::new(self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_nine_by_nine() {
        let cfg = ViewConfig::default();
        assert_eq!(cfg.radius, 4);
        assert_eq!(cfg.windower().cell_count(), 81);
    }

    #[test]
    fn empty_json_gives_defaults() {
        let cfg: ViewConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, ViewConfig::default());
    }

    #[test]
    fn nested_projection_override() {
        let cfg: ViewConfig =
            serde_json::from_str(r#"{"radius": 2, "projection": {"level_step": 20}}"#).unwrap();
        assert_eq!(cfg.radius, 2);
        assert_eq!(cfg.projection.level_step, 20);
        assert_eq!(cfg.projection.base_x, 250);
    }
}
