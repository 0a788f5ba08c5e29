use scorecard_core::{
    Category, CategoryScore, CategorySpec, Direction, IndicatorScore, IndicatorSpec,
};

/// Map one optional raw value through an indicator's tier table.
///
/// An absent value earns zero and is annotated rather than treated as an
/// error. A present value earns the fraction of the first tier it satisfies,
/// scanning from the strictest tier down; values beyond every tier earn zero.
pub(crate) fn score_indicator(spec: &IndicatorSpec, value: Option<f64>) -> IndicatorScore {
    let Some(v) = value else {
        return IndicatorScore {
            indicator: spec.name.clone(),
            points: 0.0,
            max_points: spec.max_points,
            note: "not available".to_string(),
        };
    };

    let fraction = spec
        .tiers
        .iter()
        .find(|tier| match spec.direction {
            Direction::HigherIsBetter => v >= tier.threshold,
            Direction::LowerIsBetter => v <= tier.threshold,
        })
        .map(|tier| tier.fraction)
        .unwrap_or(0.0);

    let points = spec.max_points * fraction;
    IndicatorScore {
        indicator: spec.name.clone(),
        points,
        max_points: spec.max_points,
        note: format!("{:.2} ({:.1}/{:.1} pts)", v, points, spec.max_points),
    }
}

/// Assemble a category score from per-indicator raw values, aligned with the
/// configured indicator order. A category with no inputs at all collapses to
/// a single "insufficient data" note.
pub(crate) fn score_category(
    category: Category,
    spec: &CategorySpec,
    values: &[Option<f64>],
) -> CategoryScore {
    debug_assert_eq!(spec.indicators.len(), values.len());

    if values.iter().all(|v| v.is_none()) {
        return CategoryScore {
            category,
            max_points: spec.max_points,
            actual: 0.0,
            details: vec![IndicatorScore {
                indicator: category.as_str().to_string(),
                points: 0.0,
                max_points: spec.max_points,
                note: "insufficient data".to_string(),
            }],
        };
    }

    let details: Vec<IndicatorScore> = spec
        .indicators
        .iter()
        .zip(values)
        .map(|(indicator, value)| score_indicator(indicator, *value))
        .collect();

    let actual: f64 = details.iter().map(|d| d.points).sum();
    CategoryScore {
        category,
        max_points: spec.max_points,
        // Allocations are validated at startup; the clamp also covers
        // hand-built configs.
        actual: actual.min(spec.max_points),
        details,
    }
}
