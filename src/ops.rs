use crate::common::*;
use std::fmt;

/// A transform applied to the rolls of one dice literal.
///
/// Operators never lengthen the sequence: clamps map each roll in place and
/// keeps select a subsequence.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[enum_dispatch::enum_dispatch(DiceOperate)]
pub enum DiceOperator {
    Maximum(Maximum),
    Minimum(Minimum),
    KeepHighest(KeepHighest),
    KeepLowest(KeepLowest),
}

impl fmt::Display for DiceOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Maximum(x) => x.fmt(f),
            Self::Minimum(x) => x.fmt(f),
            Self::KeepHighest(x) => x.fmt(f),
            Self::KeepLowest(x) => x.fmt(f),
        }
    }
}

impl DiceOperator {
    /// Whether this operator changes roll values rather than selecting rolls.
    pub fn is_clamp(&self) -> bool {
        matches!(self, Self::Maximum(_) | Self::Minimum(_))
    }
}

#[enum_dispatch::enum_dispatch]
pub trait DiceOperate {
    fn operate(&self, rolls: NonEmpty<UInt>) -> NonEmpty<UInt>;
}

macro_rules! dice_op_impl {
    ($(($name:ident, $disp:literal)),+ $(,)?) => {
        $(
            #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
            pub struct $name(pub(crate) NonZeroUInt);

            impl $name {
                pub fn new(x: NonZeroUInt) -> Self {
                    Self(x)
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}{}", $disp, self.0)
                }
            }
        )+
    };
}

dice_op_impl!(
    (Maximum, "ma"),
    (Minimum, "mi"),
    (KeepHighest, "kh"),
    (KeepLowest, "kl"),
);

impl DiceOperate for Maximum {
    fn operate(&self, mut rolls: NonEmpty<UInt>) -> NonEmpty<UInt> {
        let max = self.0.get();
        for roll in rolls.iter_mut() {
            if *roll > max {
                *roll = max;
            }
        }
        rolls
    }
}

impl DiceOperate for Minimum {
    fn operate(&self, mut rolls: NonEmpty<UInt>) -> NonEmpty<UInt> {
        let min = self.0.get();
        for roll in rolls.iter_mut() {
            if *roll < min {
                *roll = min;
            }
        }
        rolls
    }
}

impl DiceOperate for KeepHighest {
    fn operate(&self, rolls: NonEmpty<UInt>) -> NonEmpty<UInt> {
        keep(rolls, self.0, |candidate, best| candidate > best)
    }
}

impl DiceOperate for KeepLowest {
    fn operate(&self, rolls: NonEmpty<UInt>) -> NonEmpty<UInt> {
        keep(rolls, self.0, |candidate, best| candidate < best)
    }
}

/// Keeps `n` rolls, extracting one extreme value at a time. Ties go to the
/// earliest remaining roll, and the kept rolls come back in their original
/// relative order.
fn keep(rolls: NonEmpty<UInt>, n: NonZeroUInt, beats: impl Fn(UInt, UInt) -> bool) -> NonEmpty<UInt> {
    let n = n.get() as usize;
    if n >= rolls.len() {
        return rolls;
    }

    let mut remaining: Vec<(usize, UInt)> = rolls.iter().copied().enumerate().collect();
    let mut kept = Vec::with_capacity(n);
    for _ in 0..n {
        let mut best = 0;
        for (i, &(_, value)) in remaining.iter().enumerate().skip(1) {
            if beats(value, remaining[best].1) {
                best = i;
            }
        }
        kept.push(remaining.remove(best));
    }

    kept.sort_unstable_by_key(|&(i, _)| i);
    let kept = kept.into_iter().map(|(_, value)| value).collect();
    NonEmpty::try_from_vec(kept).expect("at least one roll is kept")
}

/// Indices of the rolls that keep operators removed from `rolls` to leave
/// `kept`. Keeps favour the earliest of equal rolls, so the kept rolls are the
/// earliest match of `kept` within `rolls`.
pub fn dropped_indices(rolls: &[UInt], kept: &[UInt]) -> Vec<usize> {
    let mut kept = kept.iter().peekable();
    let mut ret = Vec::new();
    for (i, x) in rolls.iter().enumerate() {
        if kept.peek() == Some(&x) {
            kept.next();
        } else {
            ret.push(i);
        }
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn nz(x: UInt) -> NonZeroUInt {
        NonZeroUInt::new(x).unwrap()
    }

    fn check(op: impl Into<DiceOperator>, rolls: NonEmpty<UInt>, expected: NonEmpty<UInt>) {
        let op: DiceOperator = op.into();
        assert_eq!(op.operate(rolls), expected);
    }

    #[test]
    fn test_maximum() {
        check(Maximum::new(nz(5)), vec1![7, 1, 6, 5], vec1![5, 1, 5, 5]);
        check(Maximum::new(nz(1)), vec1![7, 2, 6, 8], vec1![1, 1, 1, 1]);
        check(Maximum::new(nz(10)), vec1![7, 2, 6, 8], vec1![7, 2, 6, 8]);
    }

    #[test]
    fn test_minimum() {
        check(Minimum::new(nz(5)), vec1![7, 1, 6, 5], vec1![7, 5, 6, 5]);
        check(Minimum::new(nz(1)), vec1![7, 2, 6, 8], vec1![7, 2, 6, 8]);
        check(Minimum::new(nz(10)), vec1![7, 2, 6, 8], vec1![10, 10, 10, 10]);
    }

    #[test]
    fn test_keep_highest() {
        check(KeepHighest::new(nz(2)), vec1![6, 1, 7, 5], vec1![6, 7]);
        check(KeepHighest::new(nz(1)), vec1![2, 20], vec1![20]);
        check(KeepHighest::new(nz(10)), vec1![7, 2, 6, 8, 1], vec1![7, 2, 6, 8, 1]);
        check(KeepHighest::new(nz(5)), vec1![7, 2, 6, 8, 1], vec1![7, 2, 6, 8, 1]);
    }

    #[test]
    fn test_keep_lowest() {
        check(KeepLowest::new(nz(2)), vec1![7, 5, 6, 1], vec1![5, 1]);
        check(KeepLowest::new(nz(1)), vec1![2, 20], vec1![2]);
        check(KeepLowest::new(nz(10)), vec1![7, 2, 6, 8, 10], vec1![7, 2, 6, 8, 10]);
    }

    #[test]
    fn test_keep_duplicates() {
        // each extraction removes exactly one occurrence
        check(KeepHighest::new(nz(2)), vec1![3, 1, 3, 2], vec1![3, 3]);
        check(KeepHighest::new(nz(3)), vec1![3, 1, 3, 2], vec1![3, 3, 2]);
        check(KeepLowest::new(nz(2)), vec1![2, 1, 2, 1], vec1![1, 1]);
        check(KeepLowest::new(nz(3)), vec1![2, 1, 2, 1], vec1![2, 1, 1]);
        check(KeepLowest::new(nz(3)), vec1![4, 4, 4, 4], vec1![4, 4, 4]);
    }

    #[test]
    fn test_keep_compounds() {
        // keep-lowest sees the output of keep-highest, not the raw rolls
        let rolls = vec1![1, 6, 2, 5, 3];
        let highest = KeepHighest::new(nz(3)).operate(rolls);
        assert_eq!(highest, vec1![6, 5, 3]);
        assert_eq!(KeepLowest::new(nz(2)).operate(highest), vec1![5, 3]);
    }

    #[test]
    fn test_display() {
        assert_eq!(DiceOperator::from(Maximum::new(nz(4))).to_string(), "ma4");
        assert_eq!(DiceOperator::from(Minimum::new(nz(2))).to_string(), "mi2");
        assert_eq!(DiceOperator::from(KeepHighest::new(nz(3))).to_string(), "kh3");
        assert_eq!(DiceOperator::from(KeepLowest::new(nz(1))).to_string(), "kl1");
    }

    #[test]
    fn test_is_clamp() {
        assert!(DiceOperator::from(Maximum::new(nz(4))).is_clamp());
        assert!(DiceOperator::from(Minimum::new(nz(2))).is_clamp());
        assert!(!DiceOperator::from(KeepHighest::new(nz(3))).is_clamp());
        assert!(!DiceOperator::from(KeepLowest::new(nz(1))).is_clamp());
    }

    #[test]
    fn test_dropped_indices() {
        assert_eq!(dropped_indices(&[3, 1, 3], &[3]), [1, 2]);
        assert_eq!(dropped_indices(&[1, 2], &[1, 2]), Vec::<usize>::new());
        assert_eq!(dropped_indices(&[2, 1, 2, 1], &[2, 1, 1]), [2]);

        let rolls = [3, 1, 3, 2];
        let kept = KeepHighest::new(nz(2)).operate(NonEmpty::try_from_vec(rolls.to_vec()).unwrap());
        let kept = KeepLowest::new(nz(1)).operate(kept);
        assert_eq!(dropped_indices(&rolls, &kept), [1, 2, 3]);
    }

    fn rolls() -> impl Strategy<Value = Vec<UInt>> {
        prop::collection::vec(1u32..=20, 1..12)
    }

    fn is_subsequence(sub: &[UInt], of: &[UInt]) -> bool {
        let mut of = of.iter();
        sub.iter().all(|x| of.any(|y| x == y))
    }

    fn sorted(mut v: Vec<UInt>) -> Vec<UInt> {
        v.sort_unstable();
        v
    }

    proptest! {
        #[test]
        fn prop_maximum_clamps(rolls in rolls(), max in 1u32..=20) {
            let out = Maximum::new(nz(max)).operate(NonEmpty::try_from_vec(rolls.clone()).unwrap());
            prop_assert_eq!(out.len(), rolls.len());
            for (before, after) in rolls.iter().zip(out.iter()) {
                prop_assert!(*after <= max);
                if *before <= max {
                    prop_assert_eq!(before, after);
                }
            }
        }

        #[test]
        fn prop_minimum_clamps(rolls in rolls(), min in 1u32..=20) {
            let out = Minimum::new(nz(min)).operate(NonEmpty::try_from_vec(rolls.clone()).unwrap());
            prop_assert_eq!(out.len(), rolls.len());
            for (before, after) in rolls.iter().zip(out.iter()) {
                prop_assert!(*after >= min);
                if *before >= min {
                    prop_assert_eq!(before, after);
                }
            }
        }

        #[test]
        fn prop_keep_highest(rolls in rolls(), n in 1u32..15) {
            let out = KeepHighest::new(nz(n)).operate(NonEmpty::try_from_vec(rolls.clone()).unwrap());
            let out = out.into_vec();
            if n as usize >= rolls.len() {
                prop_assert_eq!(out, rolls);
            } else {
                prop_assert_eq!(out.len(), n as usize);
                let mut expected = sorted(rolls.clone());
                expected.reverse();
                expected.truncate(n as usize);
                prop_assert_eq!(sorted(out.clone()), sorted(expected));
                prop_assert!(is_subsequence(&out, &rolls));
                prop_assert_eq!(dropped_indices(&rolls, &out).len(), rolls.len() - out.len());
            }
        }

        #[test]
        fn prop_keep_lowest(rolls in rolls(), n in 1u32..15) {
            let out = KeepLowest::new(nz(n)).operate(NonEmpty::try_from_vec(rolls.clone()).unwrap());
            let out = out.into_vec();
            if n as usize >= rolls.len() {
                prop_assert_eq!(out, rolls);
            } else {
                prop_assert_eq!(out.len(), n as usize);
                let mut expected = sorted(rolls.clone());
                expected.truncate(n as usize);
                prop_assert_eq!(sorted(out.clone()), expected);
                prop_assert!(is_subsequence(&out, &rolls));
                prop_assert_eq!(dropped_indices(&rolls, &out).len(), rolls.len() - out.len());
            }
        }
    }
}
