//! The ordered, validated frame sequence and its timeline lookup.

use adreel_core::error::DomainError;
use serde::Serialize;

use super::frame::Frame;

/// Where a given elapsed time falls on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FramePosition {
    /// Index of the active frame.
    pub index: usize,
    /// Progress through the whole sequence, in `[0, 100]`.
    pub progress_percent: f64,
}

/// A non-empty, ordered list of frames with strictly positive durations.
///
/// The total duration is computed once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSequence {
    frames: Vec<Frame>,
    /// Cumulative end time of each frame; `ends[i]` is the sum of durations `0..=i`.
    ends: Vec<f64>,
    total: f64,
}

impl FrameSequence {
    /// Builds a sequence, validating every frame.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `frames` is empty or any frame's
    /// duration is not a positive, finite number.
    pub fn new(frames: Vec<Frame>) -> Result<Self, DomainError> {
        if frames.is_empty() {
            return Err(DomainError::Validation(
                "frame sequence must contain at least one frame".into(),
            ));
        }

        let mut ends = Vec::with_capacity(frames.len());
        let mut total = 0.0;
        for (index, frame) in frames.iter().enumerate() {
            if !frame.duration.is_finite() || frame.duration <= 0.0 {
                return Err(DomainError::Validation(format!(
                    "frame {index} has invalid duration {}; durations must be positive",
                    frame.duration
                )));
            }
            total += frame.duration;
            ends.push(total);
        }

        Ok(Self {
            frames,
            ends,
            total,
        })
    }

    /// Total duration of the sequence in seconds.
    #[must_use]
    pub fn total_duration(&self) -> f64 {
        self.total
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false`; a sequence cannot be empty. Provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Index of the final frame.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.frames.len() - 1
    }

    /// Returns the frame at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// All frames in playback order.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Resolves the active frame and progress for `elapsed_seconds`.
    ///
    /// A boundary instant belongs to the frame that starts there: with two
    /// 10 s frames, `10.0` resolves to index 1. Elapsed values at or past the
    /// total resolve to the last frame at 100 %. Negative or NaN input is
    /// treated as zero.
    #[must_use]
    pub fn position_at(&self, elapsed_seconds: f64) -> FramePosition {
        let elapsed = if elapsed_seconds.is_nan() {
            0.0
        } else {
            elapsed_seconds.max(0.0)
        };

        if elapsed >= self.total {
            return FramePosition {
                index: self.last_index(),
                progress_percent: 100.0,
            };
        }

        let index = self
            .ends
            .iter()
            .position(|&end| end > elapsed)
            .unwrap_or_else(|| self.last_index());

        FramePosition {
            index,
            progress_percent: (elapsed / self.total * 100.0).min(100.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn six_ten_second_frames() -> FrameSequence {
        let frames = (1..=6)
            .map(|n| Frame::new(10.0, format!("Headline {n}"), format!("Sub {n}")))
            .collect();
        FrameSequence::new(frames).unwrap()
    }

    #[test]
    fn test_total_duration_is_sum_of_frame_durations() {
        // Arrange
        let frames = vec![
            Frame::new(2.5, "a", "a"),
            Frame::new(4.0, "b", "b"),
            Frame::new(0.5, "c", "c"),
        ];

        // Act
        let sequence = FrameSequence::new(frames).unwrap();

        // Assert
        assert!((sequence.total_duration() - 7.0).abs() < f64::EPSILON);
        assert_eq!(sequence.len(), 3);
        assert_eq!(sequence.last_index(), 2);
    }

    #[test]
    fn test_new_rejects_empty_sequence() {
        // Act
        let result = FrameSequence::new(Vec::new());

        // Assert
        match result {
            Err(DomainError::Validation(message)) => assert!(message.contains("at least one")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_new_rejects_non_positive_and_non_finite_durations() {
        for duration in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            // Arrange
            let frames = vec![Frame::new(10.0, "ok", "ok"), Frame::new(duration, "bad", "bad")];

            // Act
            let result = FrameSequence::new(frames);

            // Assert
            match result {
                Err(DomainError::Validation(message)) => assert!(message.contains("frame 1")),
                other => panic!("expected Validation for {duration}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_position_at_reference_scenario() {
        // Arrange
        let sequence = six_ten_second_frames();

        // Act / Assert
        let start = sequence.position_at(0.0);
        assert_eq!(start.index, 0);
        assert!(start.progress_percent.abs() < f64::EPSILON);

        assert_eq!(sequence.position_at(9.999).index, 0);
        assert_eq!(sequence.position_at(10.0).index, 1);

        let middle = sequence.position_at(35.0);
        assert_eq!(middle.index, 3);
        assert!((middle.progress_percent - 58.333_333).abs() < 1e-4);

        let end = sequence.position_at(60.0);
        assert_eq!(end.index, 5);
        assert!((end.progress_percent - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_position_at_clamps_past_total_to_last_frame() {
        // Arrange
        let sequence = six_ten_second_frames();

        // Act
        let position = sequence.position_at(500.0);

        // Assert
        assert_eq!(position.index, 5);
        assert!((position.progress_percent - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_position_at_treats_negative_and_nan_as_zero() {
        // Arrange
        let sequence = six_ten_second_frames();

        // Act / Assert
        assert_eq!(sequence.position_at(-3.0), sequence.position_at(0.0));
        assert_eq!(sequence.position_at(f64::NAN), sequence.position_at(0.0));
    }

    #[test]
    fn test_boundary_instant_belongs_to_next_frame_for_uneven_durations() {
        // Arrange
        let frames = vec![
            Frame::new(3.0, "a", "a"),
            Frame::new(1.5, "b", "b"),
            Frame::new(5.5, "c", "c"),
        ];
        let sequence = FrameSequence::new(frames).unwrap();

        // Act / Assert
        assert_eq!(sequence.position_at(2.9).index, 0);
        assert_eq!(sequence.position_at(3.0).index, 1);
        assert_eq!(sequence.position_at(4.4).index, 1);
        assert_eq!(sequence.position_at(4.5).index, 2);
        assert_eq!(sequence.position_at(9.9).index, 2);
    }

    #[test]
    fn test_index_is_first_frame_whose_end_exceeds_elapsed() {
        // Arrange
        let sequence = six_ten_second_frames();

        for step in 0..600 {
            let elapsed = f64::from(step) / 10.0;

            // Act
            let position = sequence.position_at(elapsed);

            // Assert
            let end_of_active: f64 = sequence.frames()[..=position.index]
                .iter()
                .map(|f| f.duration)
                .sum();
            let end_of_previous = end_of_active - sequence.frames()[position.index].duration;
            assert!(end_of_active > elapsed, "elapsed {elapsed}");
            assert!(end_of_previous <= elapsed, "elapsed {elapsed}");
        }
    }

    #[test]
    fn test_progress_is_monotonically_non_decreasing() {
        // Arrange
        let sequence = six_ten_second_frames();
        let mut previous = -1.0;

        for step in 0..=700 {
            // Act
            let progress = sequence.position_at(f64::from(step) / 10.0).progress_percent;

            // Assert
            assert!(progress >= previous);
            assert!(progress <= 100.0);
            previous = progress;
        }
    }
}
