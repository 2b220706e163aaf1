//! Platform fee arithmetic.

use arcana_common::Cents;

/// The platform's cut of every sale, as a percentage of the order total.
pub const PLATFORM_FEE_PERCENT: i64 = 15;

/// Splits an order total into `(platform_fee, reader_net)`.
///
/// The fee is rounded half-up to the nearest centavo and the reader receives the remainder, so
/// the two parts always sum back to the total.
pub fn platform_fee_split(total: Cents) -> (Cents, Cents) {
    let fee = Cents::from((total.value() * PLATFORM_FEE_PERCENT + 50) / 100);
    (fee, total - fee)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn even_split() {
        let (fee, net) = platform_fee_split(Cents::from(10_000));
        assert_eq!(fee, Cents::from(1_500));
        assert_eq!(net, Cents::from(8_500));
    }

    #[test]
    fn fee_rounds_half_up() {
        // 15% of 999 is 149.85, which rounds to 150.
        let (fee, net) = platform_fee_split(Cents::from(999));
        assert_eq!(fee, Cents::from(150));
        assert_eq!(net, Cents::from(849));
        // 15% of 110 is 16.5, which also rounds up.
        let (fee, _) = platform_fee_split(Cents::from(110));
        assert_eq!(fee, Cents::from(17));
        // 15% of 109 is 16.35, which rounds down.
        let (fee, _) = platform_fee_split(Cents::from(109));
        assert_eq!(fee, Cents::from(16));
    }

    #[test]
    fn parts_always_sum_to_total() {
        for total in [1, 7, 99, 100, 101, 12_345, 1_000_000] {
            let total = Cents::from(total);
            let (fee, net) = platform_fee_split(total);
            assert_eq!(fee + net, total);
        }
    }
}
