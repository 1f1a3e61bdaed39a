use crate::common::{NonEmpty, NonZeroUInt, UInt};
use rand::{
    distributions::{Distribution, Uniform},
    Rng,
};
use std::num::NonZeroUsize;

/// A source of die rolls. Every value returned for a die with `sides` faces
/// must lie in `1..=sides`.
pub trait Roller {
    fn roll(&mut self, sides: NonZeroUInt) -> UInt;

    /// Rolls `num` dice, in roll order.
    fn roll_n(&mut self, num: NonZeroUsize, sides: NonZeroUInt) -> NonEmpty<UInt> {
        let mut rolls = NonEmpty::new(self.roll(sides));
        for _ in 1..num.get() {
            rolls.push(self.roll(sides));
        }
        rolls
    }
}

impl<R: Rng> Roller for R {
    fn roll(&mut self, sides: NonZeroUInt) -> UInt {
        self.gen_range(1..=sides.get())
    }

    fn roll_n(&mut self, num: NonZeroUsize, sides: NonZeroUInt) -> NonEmpty<UInt> {
        let dist = Uniform::new_inclusive(1, sides.get());
        let mut rolls = NonEmpty::new(dist.sample(self));
        rolls.extend(dist.sample_iter(&mut *self).take(num.get() - 1));
        rolls
    }
}

#[cfg(test)]
pub(crate) use step::StepRoller;
