// transform.rs

/// Payload record carried through the lanes.
///
/// Opaque to the queue machinery; only the enqueue transforms look inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub level: f32,
    pub channel: i32,
}

impl Sample {
    pub fn new(level: f32, channel: i32) -> Self {
        Self { level, channel }
    }
}

/// Hook applied to an item during `enqueue`, inside the lane's critical
/// section. Must be synchronous and O(1): the buffer guard is held while it
/// runs, and it runs exactly once per enqueued item.
pub trait EnqueueTransform<T>: Send + Sync {
    fn apply(&self, item: &mut T);
}

/// No-op transform for lanes that buffer items unchanged.
pub struct PassThrough;

impl PassThrough {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PassThrough {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send> EnqueueTransform<T> for PassThrough {
    fn apply(&self, _item: &mut T) {}
}

/// Adjusts the level field by the sign of the channel field: negative
/// channels gain 1.0, non-negative channels lose 1.0.
pub struct SignAdjust;

impl SignAdjust {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SignAdjust {
    fn default() -> Self {
        Self::new()
    }
}

impl EnqueueTransform<Sample> for SignAdjust {
    fn apply(&self, item: &mut Sample) {
        if item.channel < 0 {
            item.level += 1.0;
        } else {
            item.level -= 1.0;
        }
    }
}

/// Adjusts the channel field by the parity of the level field: levels that
/// sit exactly on an even integer bump the channel up, everything else bumps
/// it down.
pub struct ParityAdjust;

impl ParityAdjust {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ParityAdjust {
    fn default() -> Self {
        Self::new()
    }
}

impl EnqueueTransform<Sample> for ParityAdjust {
    fn apply(&self, item: &mut Sample) {
        if item.level.fract() == 0.0 && (item.level as i64) % 2 == 0 {
            item.channel += 1;
        } else {
            item.channel -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_adjust_negative_channel() {
        let mut sample = Sample::new(1.0, -3);
        SignAdjust::new().apply(&mut sample);
        assert_eq!(sample.level, 2.0);
        assert_eq!(sample.channel, -3);
    }

    #[test]
    fn test_sign_adjust_non_negative_channel() {
        let mut sample = Sample::new(1.0, 5);
        SignAdjust::new().apply(&mut sample);
        assert_eq!(sample.level, 0.0);

        // Zero counts as non-negative
        let mut sample = Sample::new(1.0, 0);
        SignAdjust::new().apply(&mut sample);
        assert_eq!(sample.level, 0.0);
    }

    #[test]
    fn test_parity_adjust_even_level() {
        let mut sample = Sample::new(4.0, 7);
        ParityAdjust::new().apply(&mut sample);
        assert_eq!(sample.channel, 8);
        assert_eq!(sample.level, 4.0);

        let mut sample = Sample::new(0.0, 0);
        ParityAdjust::new().apply(&mut sample);
        assert_eq!(sample.channel, 1);
    }

    #[test]
    fn test_parity_adjust_odd_or_fractional_level() {
        let mut sample = Sample::new(3.0, 7);
        ParityAdjust::new().apply(&mut sample);
        assert_eq!(sample.channel, 6);

        // A fractional level is not an even integer
        let mut sample = Sample::new(4.5, 7);
        ParityAdjust::new().apply(&mut sample);
        assert_eq!(sample.channel, 6);
    }

    #[test]
    fn test_pass_through_leaves_item_alone() {
        let mut sample = Sample::new(2.5, -1);
        PassThrough::new().apply(&mut sample);
        assert_eq!(sample, Sample::new(2.5, -1));
    }
}
