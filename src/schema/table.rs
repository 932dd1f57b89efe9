//! Built-in Feature Table
//!
//! Display labels and codes the deployed hypothermia model was trained with.
//! Labels are stored raw; markup escaping happens in the renderer.

use super::spec::FeatureSpec;

/// Categorical features: (name, [(label, code)])
pub const CATEGORICAL: &[(&str, &[(&str, f64)])] = &[
    ("BMI", &[
        ("<18.5 (Code: 0)", 0.0),
        ("18.5-23.9 (Code: 1)", 1.0),
        ("≥24 (Code: 2)", 2.0),
    ]),
    ("Duration_of_operation", &[
        ("≤60 min (Code: 0)", 0.0),
        (">60 min (Code: 1)", 1.0),
    ]),
    ("Duration_of_anesthesia", &[
        ("≤70 min (Code: 0)", 0.0),
        (">70 min (Code: 1)", 1.0),
    ]),
    ("Age", &[
        ("<60 (Code: 0)", 0.0),
        ("≥60 (Code: 1)", 1.0),
    ]),
    ("Endoscopic_technique", &[
        ("ESD (Code: 0)", 0.0),
        ("EFTR (Code: 1)", 1.0),
    ]),
    ("Sex", &[
        ("Female (Code: 0)", 0.0),
        ("Male (Code: 1)", 1.0),
    ]),
];

/// Continuous features: (name, [min, max, default, step])
pub const CONTINUOUS: &[(&str, [f64; 4])] = &[
    ("Operating_room_temperature", [18.0, 30.0, 22.0, 0.1]),
    ("Basal_body_temperature", [35.0, 42.0, 36.5, 0.1]),
];

/// All built-in entries, categorical first
pub fn entries() -> Vec<(String, FeatureSpec)> {
    let categorical = CATEGORICAL.iter().map(|(name, options)| {
        (name.to_string(), FeatureSpec::categorical(options.iter().copied()))
    });
    let continuous = CONTINUOUS.iter().map(|(name, [min, max, default, step])| {
        (name.to_string(), FeatureSpec::continuous(*min, *max, *default, *step))
    });
    categorical.chain(continuous).collect()
}
