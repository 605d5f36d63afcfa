//! Pricing

use crate::services::ServiceItem;

/// Sum of current prices; reference prices are ignored.
///
/// An empty slice totals zero. The sum saturates rather than wrapping.
pub fn subtotal(items: &[ServiceItem]) -> u64 {
    items
        .iter()
        .fold(0_u64, |acc, item| acc.saturating_add(item.price))
}

/// Subtract `discount` from `subtotal`, flooring at zero.
pub fn final_total(subtotal: u64, discount: u64) -> u64 {
    subtotal.saturating_sub(discount)
}

/// Sum of per-item savings against reference prices.
pub fn reference_savings(items: &[ServiceItem]) -> u64 {
    items
        .iter()
        .filter_map(ServiceItem::reference_savings)
        .fold(0_u64, u64::saturating_add)
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;

    fn item(id: &str, price: u64) -> ServiceItem {
        ServiceItem::new(id, id, price, NonZeroU32::MIN)
    }

    #[test]
    fn test_subtotal() {
        let items = [item("a", 899), item("b", 499)];

        assert_eq!(subtotal(&items), 1398);
    }

    #[test]
    fn test_subtotal_empty() {
        assert_eq!(subtotal(&[]), 0);
    }

    #[test]
    fn subtotal_ignores_original_price() {
        let items = [item("a", 899).with_original_price(1299)];

        assert_eq!(subtotal(&items), 899);
    }

    #[test]
    fn final_total_floors_at_zero() {
        assert_eq!(final_total(499, 1000), 0);
        assert_eq!(final_total(1398, 140), 1258);
    }

    #[test]
    fn test_reference_savings() {
        let items = [
            item("a", 899).with_original_price(1299),
            item("b", 499).with_original_price(699),
            item("c", 799),
        ];

        assert_eq!(reference_savings(&items), 600);
    }
}
