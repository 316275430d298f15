use histothresh_core::Plane;
use serde::{Deserialize, Serialize};

use crate::adaptive::{
    threshold_niblack, threshold_sauvola, threshold_wolf_jolion, NiblackParams, SauvolaParams,
    WolfJolionParams,
};
use crate::global::{threshold_bimodal_valley, threshold_manual, threshold_otsu};
use crate::region::{threshold_double, threshold_double_hysteresis};
use crate::ThresholdError;

/// Any of the eight binarization strategies, with its parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ThresholdMethod {
    Manual { t: i32 },
    BimodalValley,
    Otsu,
    Double { t_low: i32, t_high: i32 },
    DoubleHysteresis { t_low: i32, t_high: i32 },
    Niblack(NiblackParams),
    Sauvola(SauvolaParams),
    WolfJolion(WolfJolionParams),
}

impl ThresholdMethod {
    pub fn name(&self) -> &'static str {
        match self {
            ThresholdMethod::Manual { .. } => "manual",
            ThresholdMethod::BimodalValley => "bimodal_valley",
            ThresholdMethod::Otsu => "otsu",
            ThresholdMethod::Double { .. } => "double",
            ThresholdMethod::DoubleHysteresis { .. } => "double_hysteresis",
            ThresholdMethod::Niblack(_) => "niblack",
            ThresholdMethod::Sauvola(_) => "sauvola",
            ThresholdMethod::WolfJolion(_) => "wolf_jolion",
        }
    }

    /// Binarize a grayscale map. The result only contains 0 and 255.
    pub fn apply(&self, gray: &Plane) -> Result<Plane, ThresholdError> {
        match self {
            ThresholdMethod::Manual { t } => Ok(threshold_manual(gray, *t)),
            ThresholdMethod::BimodalValley => threshold_bimodal_valley(gray),
            ThresholdMethod::Otsu => threshold_otsu(gray),
            ThresholdMethod::Double { t_low, t_high } => {
                Ok(threshold_double(gray, *t_low, *t_high))
            }
            ThresholdMethod::DoubleHysteresis { t_low, t_high } => {
                Ok(threshold_double_hysteresis(gray, *t_low, *t_high))
            }
            ThresholdMethod::Niblack(p) => threshold_niblack(gray, p),
            ThresholdMethod::Sauvola(p) => threshold_sauvola(gray, p),
            ThresholdMethod::WolfJolion(p) => threshold_wolf_jolion(gray, p),
        }
    }
}
