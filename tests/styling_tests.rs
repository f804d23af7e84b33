use quakemap::prelude::*;
use quakemap::styling::feature::style_for_magnitude;

#[test]
fn test_classifier_thresholds() {
    let cases = [
        (7.1, MagnitudeColor::DeepPurple),
        (5.0001, MagnitudeColor::DeepPurple),
        (5.0, MagnitudeColor::DarkRed),
        (4.2, MagnitudeColor::DarkRed),
        (4.0, MagnitudeColor::Red),
        (3.0, MagnitudeColor::Orange),
        (2.5, MagnitudeColor::Orange),
        (2.0, MagnitudeColor::Amber),
        (1.0, MagnitudeColor::PaleYellowGreen),
        (0.0, MagnitudeColor::PaleYellowGreen),
        (-1.5, MagnitudeColor::PaleYellowGreen),
        (f64::NAN, MagnitudeColor::PaleYellowGreen),
    ];
    for (mag, expected) in cases {
        assert_eq!(magnitude_color(mag), expected, "magnitude {}", mag);
    }
}

#[test]
fn test_sizer() {
    assert_eq!(marker_radius(0.0), 1.0);
    assert_eq!(marker_radius(3.0), 9.0);
    assert_eq!(marker_radius(-2.0), -6.0);
}

#[test]
fn test_styler_for_moderate_quake() {
    let style = style_for_magnitude(4.5);
    assert_eq!(style.fill_color.to_hex(), "#900C3F");
    assert_eq!(style.radius, 13.5);
    assert_eq!(style.weight, 0.5);
    assert!(style.stroke);
}

#[test]
fn test_legend_follows_classifier() {
    let legend = Legend::new();
    assert_eq!(legend.entries.len(), 6);
    assert!(legend.entries.iter().all(|e| !e.label.is_empty()));
    assert!(legend.entries.last().unwrap().label.ends_with('+'));

    for (bucket, entry) in MAGNITUDE_SCALE.iter().zip(&legend.entries) {
        let lower = f64::from(bucket.lower_bound);
        for mag in [lower + 0.01, lower + 0.5, lower + 1.0] {
            assert_eq!(entry.color, magnitude_color(mag).color(), "magnitude {}", mag);
        }
    }
}
