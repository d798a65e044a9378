//! Even division of a duration.

use vibe_common::timecode::TimeSpan;

/// Split `[0, total)` into `count` contiguous spans of `total / count`.
///
/// Span `k` is `[k*total/count, (k+1)*total/count)`. The last span ends at
/// exactly `total` so rounding never loses or adds time.
pub fn equal_spans(total: f64, count: usize) -> Vec<TimeSpan> {
    if count == 0 || total <= 0.0 {
        return Vec::new();
    }
    let n = count as f64;
    (0..count)
        .map(|k| {
            let start = total * k as f64 / n;
            let end = if k + 1 == count {
                total
            } else {
                total * (k + 1) as f64 / n
            };
            TimeSpan::new(start, end)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ten_seconds_over_three_images() {
        let spans = equal_spans(10.0, 3);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].start, 0.0);
        assert!((spans[0].end - 10.0 / 3.0).abs() < 1e-12);
        assert!((spans[1].end - 20.0 / 3.0).abs() < 1e-12);
        assert_eq!(spans[2].end, 10.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(equal_spans(10.0, 0).is_empty());
        assert!(equal_spans(0.0, 3).is_empty());
        assert_eq!(equal_spans(7.5, 1), vec![TimeSpan::new(0.0, 7.5)]);
    }

    proptest! {
        #[test]
        fn prop_spans_cover_total_exactly(total in 0.001f64..10_000.0, count in 1usize..64) {
            let spans = equal_spans(total, count);
            prop_assert_eq!(spans.len(), count);
            prop_assert_eq!(spans[0].start, 0.0);
            prop_assert_eq!(spans[count - 1].end, total);
            for pair in spans.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
            }
            let step = total / count as f64;
            for span in &spans[..count - 1] {
                prop_assert!((span.len() - step).abs() <= 1e-9 * total.max(1.0));
            }
            let sum: f64 = spans.iter().map(TimeSpan::len).sum();
            prop_assert!((sum - total).abs() <= 1e-9 * total.max(1.0));
        }
    }
}
