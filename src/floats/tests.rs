// Tests for the floats module
use super::*;
use crate::entropy::{RngEntropySource, ScriptedEntropySource};

fn seeded<T: MagnitudeFloat>(low: T, high: T, seed: u64) -> FloatGenerator<T, RngEntropySource> {
    FloatGenerator::new(low, high, RngEntropySource::seeded(seed)).unwrap()
}

fn exponents(buckets: &ScaleBuckets) -> Vec<(i32, bool)> {
    buckets.iter().map(|b| (b.exponent, b.negative)).collect()
}

#[test]
fn test_construction_rejects_unusable_bounds() {
    let entropy = ScriptedEntropySource::default;
    assert!(FloatGenerator::new(2.0, 1.0, entropy()).unwrap_err().is_configuration());
    assert!(FloatGenerator::new(f64::MAX, f64::MAX, entropy()).is_err());
    assert!(FloatGenerator::new(f32::MIN, f32::MIN, entropy()).is_err());
    assert!(FloatGenerator::new(f64::NAN, 1.0, entropy()).is_err());
    assert!(FloatGenerator::new(0.0, f64::INFINITY, entropy()).is_err());

    // Extreme but usable bounds are accepted.
    assert!(FloatGenerator::new(f64::MIN, f64::MAX, entropy()).is_ok());
    assert!(FloatGenerator::new(3.5, 3.5, entropy()).is_ok());
}

#[test]
fn test_decimal_exponent() {
    assert_eq!(decimal_exponent(1.0), Some(0));
    assert_eq!(decimal_exponent(999.0), Some(2));
    assert_eq!(decimal_exponent(1000.0), Some(3));
    assert_eq!(decimal_exponent(0.1), Some(-1));
    assert_eq!(decimal_exponent(0.099), Some(-2));
    assert_eq!(decimal_exponent(f64::MAX), Some(308));
    assert_eq!(decimal_exponent(0.0), None);
    assert_eq!(decimal_exponent(f64::INFINITY), None);
}

#[test]
fn test_pow10_stays_nonzero_near_subnormals() {
    assert_eq!(pow10(3), 1000.0);
    assert_eq!(pow10(-1), 0.1);
    assert!(pow10(-323) > 0.0);
    assert!(pow10(-320) > pow10(-323));
    assert_eq!(pow10(-324), 0.0);
    assert_eq!(pow10(309), f64::INFINITY);
}

fn power_of_ten(exponent: i32) -> f64 {
    format!("1e{}", exponent).parse().unwrap()
}

#[test]
fn test_pow10_matches_decimal_literals() {
    assert_eq!(pow10(-23), 1e-23);
    assert_eq!(pow10(33), 1e33);
    assert_eq!(pow10(-305), 1e-305);
    for exponent in -323..=308 {
        assert_eq!(pow10(exponent), power_of_ten(exponent), "10^{}", exponent);
    }
}

#[test]
fn test_decimal_exponent_of_every_power_of_ten() {
    for exponent in -323..=308 {
        let magnitude = power_of_ten(exponent);
        assert_eq!(decimal_exponent(magnitude), Some(exponent), "1e{}", exponent);
        if exponent > -323 {
            assert_eq!(
                decimal_exponent(next_down(magnitude)),
                Some(exponent - 1),
                "just below 1e{}",
                exponent
            );
        }
    }
}

#[test]
fn test_power_of_ten_bounds_give_one_bucket_per_decade() {
    let settings = MagnitudeSettings::of::<f64>();
    for exponent in -323..=304 {
        let (low, high) = (power_of_ten(exponent), power_of_ten(exponent + 4));
        let buckets = ScaleBuckets::new(low, high, settings);
        assert_eq!(buckets.len(), 4, "[1e{}, 1e{}]", exponent, exponent + 4);
        assert_eq!(buckets.min_exponent(), exponent);
        assert_eq!(buckets.max_exponent(), exponent + 3);

        let negative = ScaleBuckets::new(-high, -low, settings);
        assert_eq!(negative.len(), 4, "[-1e{}, -1e{}]", exponent + 4, exponent);
    }
}

#[test]
fn test_power_of_ten_bounds_are_not_pinned() {
    for &(low, high) in &[(1e-23, 1e-19), (1e-30, 1e-26), (1e33, 1e37), (1e-5, 1e-1)] {
        let mut generator = seeded(low, high, 11);
        let mut decades = [0usize; 4];
        let mut pinned = 0;
        for _ in 0..10_000 {
            let value = generator.next();
            assert!(value >= low && value <= high);
            if value == low || value == high {
                pinned += 1;
            }
            let decade = decimal_exponent(value).unwrap() - decimal_exponent(low).unwrap();
            decades[decade.min(3) as usize] += 1;
        }
        assert!(pinned < 10, "{} of [{}, {}] pinned to a bound", pinned, low, high);
        for &count in &decades {
            let share = count as f64 / 10_000.0;
            assert!((share - 0.25).abs() < 0.03, "[{}, {}] decade share {}", low, high, share);
        }
    }
}

#[test]
fn test_positive_range_buckets() {
    let buckets = ScaleBuckets::new(0.1, 1000.0, MagnitudeSettings::of::<f64>());
    assert_eq!(
        exponents(&buckets),
        vec![(-1, false), (0, false), (1, false), (2, false)]
    );
    assert_eq!(buckets.fraction_bounds(0), (1.0, 10.0));
    assert_eq!(buckets.fraction_bounds(3), (1.0, 10.0));
}

#[test]
fn test_negative_range_buckets_descend() {
    let buckets = ScaleBuckets::new(-1000.0, -0.1, MagnitudeSettings::of::<f64>());
    assert_eq!(
        exponents(&buckets),
        vec![(2, true), (1, true), (0, true), (-1, true)]
    );
}

#[test]
fn test_straddling_range_meets_at_epsilon() {
    let buckets = ScaleBuckets::new(-1.0, 1.0, MagnitudeSettings::of::<f32>());
    let list = exponents(&buckets);
    assert_eq!(list.len(), 88);
    assert_eq!(list[0], (-1, true));
    assert_eq!(list[43], (-44, true));
    assert_eq!(list[44], (-44, false));
    assert_eq!(list[87], (-1, false));
}

#[test]
fn test_partial_decades_clamp_fractions() {
    let buckets = ScaleBuckets::new(2.0, 5.0, MagnitudeSettings::of::<f64>());
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets.fraction_bounds(0), (2.0, 5.0));

    let negative = ScaleBuckets::new(-50.0, -3.0, MagnitudeSettings::of::<f64>());
    assert_eq!(negative.fraction_bounds(0), (1.0, 5.0));
    assert_eq!(negative.fraction_bounds(1), (3.0, 10.0));
}

#[test]
fn test_inverted_fraction_bounds_widen_to_zero() {
    let buckets = ScaleBuckets::new(-1.0, 0.0, MagnitudeSettings::of::<f64>());
    let last = buckets.len() - 1;
    assert_eq!(buckets.fraction_bounds(last), (0.0, 0.0));

    let zero = ScaleBuckets::new(0.0, 0.0, MagnitudeSettings::of::<f64>());
    assert_eq!(zero.len(), 1);
    assert_eq!(zero.fraction_bounds(0), (0.0, 0.0));
}

#[test]
fn test_custom_epsilon_exponent() {
    let settings = MagnitudeSettings {
        epsilon_exponent: -5,
        min_interval_delta: 2,
    };
    let buckets = ScaleBuckets::new(0.0, 1.0, settings);
    assert_eq!(buckets.len(), 5);
    assert_eq!(buckets.min_exponent(), -5);
    assert_eq!(buckets.max_exponent(), -1);

    let entropy = ScriptedEntropySource::default();
    let generator = FloatGenerator::with_settings(0.0, 1.0, settings, entropy).unwrap();
    assert_eq!(generator.settings(), settings);
    assert_eq!(generator.buckets().len(), 5);
}

#[test]
fn test_min_interval() {
    let settings = MagnitudeSettings::of::<f64>();
    assert!((settings.min_interval(1000.0) - 1e-13).abs() < 1e-27);
    assert!((settings.min_interval(-1000.0) - 1e-13).abs() < 1e-27);
    assert_eq!(settings.min_interval(0.0), pow10(-323));
}

#[test]
fn test_scripted_bucket_choice() {
    // [1, 100] spans the decades e=0 and e=1.
    let entropy = ScriptedEntropySource::new(vec![1, 0]);
    let mut generator = FloatGenerator::new(1.0, 100.0, entropy).unwrap();
    assert_eq!(generator.next(), 10.0);

    let entropy = ScriptedEntropySource::new(vec![0, 0]);
    let mut generator = FloatGenerator::new(1.0, 100.0, entropy).unwrap();
    assert_eq!(generator.next(), 1.0);
}

#[test]
fn test_bounds_hold_across_widths() {
    let mut wide = seeded(f64::MIN, f64::MAX, 1);
    let mut narrow = seeded(-1e-30f32, 3e7f32, 2);
    let mut half = seeded(f16::from_f32(-2.5), f16::from_f32(600.0), 3);
    for _ in 0..10_000 {
        let value = wide.next();
        assert!(value.is_finite());

        let value = narrow.next();
        assert!(value >= -1e-30 && value <= 3e7);

        let value = half.next();
        assert!(value >= f16::from_f32(-2.5) && value <= f16::from_f32(600.0));
    }
}

#[test]
fn test_single_point_domain() {
    let mut generator = seeded(5.0, 5.0, 4);
    for _ in 0..100 {
        assert_eq!(generator.next(), 5.0);
    }
    assert!(generator.next_distinct(5.0).is_err());
    assert_eq!(generator.next_distinct(6.0).unwrap(), 5.0);
}

#[test]
fn test_magnitude_fairness() {
    let mut generator = seeded(0.1, 1000.0, 5);
    let mut decades = [0usize; 4];
    for _ in 0..10_000 {
        let value = generator.next();
        let decade = if value < 1.0 {
            0
        } else if value < 10.0 {
            1
        } else if value < 100.0 {
            2
        } else {
            3
        };
        decades[decade] += 1;
    }
    for &count in &decades {
        let share = count as f64 / 10_000.0;
        assert!((share - 0.25).abs() < 0.03, "decade share {} too far from 25%", share);
    }
}

#[test]
fn test_distinct_never_collides() {
    let mut generator = seeded(0.0, 1.0, 6);
    for _ in 0..1000 {
        let other = generator.next();
        assert_ne!(generator.next_distinct(other).unwrap(), other);
    }
    assert!(generator.next_distinct(f64::NAN).is_ok());
}

#[test]
fn test_distinct_steps_off_a_stuck_source() {
    // A source that always yields zero keeps drawing the low edge.
    let entropy = ScriptedEntropySource::new(vec![0]);
    let mut generator = FloatGenerator::new(1.0, 100.0, entropy).unwrap();
    assert_eq!(generator.next(), 1.0);
    assert_eq!(generator.next_distinct(1.0).unwrap(), next_up(1.0));
}

#[test]
fn test_directional_queries() {
    let mut generator = seeded(0.0, 10.0, 7);
    for _ in 0..1000 {
        let value = generator.next_greater_than(5.0).unwrap();
        assert!(value > 5.0 && value <= 10.0);

        let value = generator.next_greater_than_or_equal_to(5.0).unwrap();
        assert!(value >= 5.0 && value <= 10.0);

        let value = generator.next_less_than(5.0).unwrap();
        assert!(value >= 0.0 && value < 5.0);

        let value = generator.next_less_than_or_equal_to(5.0).unwrap();
        assert!(value >= 0.0 && value <= 5.0);
    }
}

#[test]
fn test_directional_edges() {
    let mut generator = seeded(0.0, 10.0, 8);

    assert_eq!(
        generator.next_greater_than(10.0).unwrap_err().relation(),
        Some(Relation::GreaterThan)
    );
    assert!(generator.next_less_than(0.0).is_err());
    assert!(generator.next_greater_than_or_equal_to(10.5).is_err());
    assert!(generator.next_less_than_or_equal_to(-0.5).is_err());
    assert!(generator.next_greater_than(f64::NAN).is_err());
    assert!(generator.next_less_than(f64::NAN).is_err());
    assert_eq!(
        generator.next_greater_than_or_equal_to(f64::NAN).unwrap_err().relation(),
        Some(Relation::GreaterThanOrEqualTo)
    );
    assert_eq!(
        generator.next_less_than_or_equal_to(f64::NAN).unwrap_err().relation(),
        Some(Relation::LessThanOrEqualTo)
    );

    // References outside the domain leave the whole domain available.
    let value = generator.next_greater_than(-3.0).unwrap();
    assert!(generator.is_in_domain(value));
    let value = generator.next_less_than(f64::INFINITY).unwrap();
    assert!(generator.is_in_domain(value));
    assert_eq!(generator.next_greater_than_or_equal_to(10.0).unwrap(), 10.0);
    assert_eq!(generator.next_less_than_or_equal_to(0.0).unwrap(), 0.0);
}

#[test]
fn test_strict_queries_step_past_rounding() {
    // The decimal step near 1.0 is far below one ulp; the query must still
    // return strictly larger values.
    let mut generator = seeded(1.0, 2.0, 9);
    for _ in 0..1000 {
        assert!(generator.next_greater_than(1.0).unwrap() > 1.0);
    }

    let mut generator = seeded(0.0, 1.0, 10);
    assert_eq!(generator.next_greater_than(next_down(1.0)).unwrap(), 1.0);
    assert_eq!(generator.next_less_than(next_up(0.0)).unwrap(), 0.0);

    let mut narrow = seeded(1.0f32, 2.0f32, 11);
    for _ in 0..1000 {
        assert!(narrow.next_less_than(2.0).unwrap() < 2.0);
    }
}

#[test]
fn test_next_up_and_down() {
    assert_eq!(next_up(0.0f64), f64::from_bits(1));
    assert_eq!(next_down(0.0f64), -f64::from_bits(1));
    assert!(next_up(1.0f64) > 1.0);
    assert!(next_down(1.0f64) < 1.0);
    assert!(next_up(-1.0f32) > -1.0);
    assert!(next_down(-1.0f32) < -1.0);
    assert_eq!(next_up(f16::from_f32(1.0)), f16::from_f32(1.0009766));
}
