//! Operations addressable by name from configs and the CLI.

use histothresh_adjust::Adjustment;
use histothresh_core::{to_gray, Plane, Raster};
use histothresh_threshold::ThresholdMethod;
use log::debug;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::PipelineError;

/// One processing step.
///
/// JSON form: `{"kind": "adjust", "op": "clamp", "low": 10, "high": 240}`,
/// `{"kind": "threshold", "method": "sauvola", "k": 0.3}` or
/// `{"kind": "grayscale"}`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Operation {
    Adjust(Adjustment),
    Grayscale,
    Threshold(ThresholdMethod),
}

/// Result of an [`Operation`]: a transformed raster or a single-channel plane.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Output {
    Raster(Raster),
    Plane(Plane),
}

impl Output {
    /// Raster view of the output; planes are replicated into three channels.
    pub fn into_raster(self) -> Raster {
        match self {
            Output::Raster(r) => r,
            Output::Plane(p) => Raster::from_gray(&p),
        }
    }
}

impl Operation {
    pub fn name(&self) -> String {
        match self {
            Operation::Adjust(adj) => format!("adjust:{}", adjustment_name(adj)),
            Operation::Grayscale => "grayscale".to_string(),
            Operation::Threshold(m) => format!("threshold:{}", m.name()),
        }
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(raster), fields(op = %self.name()))
    )]
    pub fn apply(&self, raster: &Raster) -> Result<Output, PipelineError> {
        raster.ensure_non_empty()?;
        debug!("applying {}", self.name());
        match self {
            Operation::Adjust(adj) => {
                let mut out = raster.clone();
                adj.apply_raster(&mut out)?;
                Ok(Output::Raster(out))
            }
            Operation::Grayscale => Ok(Output::Plane(to_gray(raster))),
            Operation::Threshold(method) => {
                let gray = to_gray(raster);
                Ok(Output::Plane(method.apply(&gray)?))
            }
        }
    }
}

fn adjustment_name(adj: &Adjustment) -> &'static str {
    match adj {
        Adjustment::Clamp { .. } => "clamp",
        Adjustment::Normalize { .. } => "normalize",
        Adjustment::AddConstant { .. } => "add_constant",
        Adjustment::BrightenWithRange { .. } => "brighten_with_range",
        Adjustment::Contrast { .. } => "contrast",
        Adjustment::StretchHistogram { .. } => "stretch_histogram",
    }
}

/// Apply `steps` in order. A plane-producing step becomes the next raster.
pub fn run_steps(raster: Raster, steps: &[Operation]) -> Result<Raster, PipelineError> {
    let mut current = raster;
    for step in steps {
        current = step.apply(&current)?.into_raster();
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use histothresh_core::ImageError;

    fn sample_raster() -> Raster {
        let px: Vec<u8> = (0..4 * 3 * 3u32).map(|i| (i * 23 % 256) as u8).collect();
        Raster::from_interleaved_rgb(4, 3, &px).unwrap()
    }

    #[test]
    fn operations_parse_from_json() {
        let steps: Vec<Operation> = serde_json::from_str(
            r#"[
                {"kind": "adjust", "op": "clamp", "low": 10, "high": 240},
                {"kind": "grayscale"},
                {"kind": "threshold", "method": "sauvola", "k": 0.3}
            ]"#,
        )
        .unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(
            steps[0],
            Operation::Adjust(Adjustment::Clamp { low: 10, high: 240 })
        );
        assert_eq!(steps[1], Operation::Grayscale);
        assert_eq!(steps[2].name(), "threshold:sauvola");
    }

    #[test]
    fn threshold_produces_mask_plane() {
        let raster = sample_raster();
        let out = Operation::Threshold(ThresholdMethod::Manual { t: 128 })
            .apply(&raster)
            .unwrap();
        let Output::Plane(mask) = out else {
            panic!("expected a plane");
        };
        assert_eq!((mask.width(), mask.height()), (4, 3));
        assert!(mask.as_raw().iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn steps_chain_through_rasters() {
        let raster = sample_raster();
        let out = run_steps(
            raster,
            &[
                Operation::Adjust(Adjustment::AddConstant { k: 300 }),
                Operation::Threshold(ThresholdMethod::Otsu),
            ],
        )
        .unwrap();
        // Everything saturated to white, so Otsu sees a flat image.
        for plane in out.channels() {
            assert!(plane.as_raw().iter().all(|&v| v == 255));
        }
    }

    #[test]
    fn empty_raster_is_rejected() {
        let raster = Raster::from_interleaved_rgb(0, 0, &[]).unwrap();
        let err = Operation::Grayscale.apply(&raster).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Image(ImageError::EmptyImage { .. })
        ));
    }
}
