//! Running bill accumulation
//!
//! `AccumulatorState` is the per-call `(total_quantity, total_amount)` pair.
//! [`AccumulatorState::step`] is the fold shared by both order modes: it
//! validates one cart entry, resolves its price and returns the next state
//! together with the snapshot describing it. The input state is never
//! modified, so a rejected entry cannot corrupt totals already accumulated.

use crate::core::traits::PriceLookup;
use crate::types::{BillKind, BillSnapshot, BillingError, CartEntry};
use rust_decimal::Decimal;

/// Totals accumulated by one call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccumulatorState {
    total_quantity: u64,
    total_amount: Decimal,
}

impl AccumulatorState {
    /// Fresh `(0, 0)` state for a new call
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_quantity(&self) -> u64 {
        self.total_quantity
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    /// Describe the current totals as a snapshot of the given kind
    pub fn snapshot(&self, kind: BillKind) -> BillSnapshot {
        BillSnapshot::new(kind, self.total_quantity, self.total_amount)
    }

    /// Fold one cart entry into the totals
    ///
    /// `sequence` is the 1-based position of the entry in the call's inbound
    /// stream and only feeds error reporting.
    ///
    /// # Returns
    ///
    /// The next state and an `Interim` snapshot of it.
    ///
    /// # Errors
    ///
    /// - `EmptyItemName` / `NegativeQuantity` if the entry is malformed
    /// - `ItemNotFound` if the catalog has no such item
    /// - `ArithmeticOverflow` if a total would overflow
    pub fn step<P>(
        self,
        prices: &P,
        entry: &CartEntry,
        sequence: u64,
    ) -> Result<(Self, BillSnapshot), BillingError>
    where
        P: PriceLookup + ?Sized,
    {
        let quantity = validate_entry(entry, sequence)?;
        let unit_price = prices.unit_price(&entry.item_name)?;

        let line_amount = unit_price
            .checked_mul(Decimal::from(quantity))
            .ok_or_else(|| BillingError::arithmetic_overflow(&entry.item_name))?;
        let total_amount = self
            .total_amount
            .checked_add(line_amount)
            .ok_or_else(|| BillingError::arithmetic_overflow(&entry.item_name))?;
        let total_quantity = self
            .total_quantity
            .checked_add(quantity)
            .ok_or_else(|| BillingError::arithmetic_overflow(&entry.item_name))?;

        let next = Self {
            total_quantity,
            total_amount,
        };
        Ok((next, next.snapshot(BillKind::Interim)))
    }
}

/// Check a cart entry before it is folded
///
/// Returns the quantity as an unsigned count.
pub fn validate_entry(entry: &CartEntry, sequence: u64) -> Result<u64, BillingError> {
    if entry.item_name.trim().is_empty() {
        return Err(BillingError::empty_item_name(sequence));
    }

    u64::try_from(entry.quantity)
        .map_err(|_| BillingError::negative_quantity(sequence, entry.quantity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Catalog;
    use rstest::rstest;

    /// Every item costs the same
    struct FlatPrice(Decimal);

    impl PriceLookup for FlatPrice {
        fn unit_price(&self, _name: &str) -> Result<Decimal, BillingError> {
            Ok(self.0)
        }
    }

    fn fold(prices: &dyn PriceLookup, cart: &[CartEntry]) -> Vec<BillSnapshot> {
        let mut state = AccumulatorState::new();
        let mut snapshots = Vec::new();
        for (index, entry) in cart.iter().enumerate() {
            let (next, snapshot) = state.step(prices, entry, index as u64 + 1).unwrap();
            state = next;
            snapshots.push(snapshot);
        }
        snapshots
    }

    #[test]
    fn test_fruit_stand_running_totals() {
        let catalog = Catalog::fruit_stand();
        let cart = [
            CartEntry::new("Pineapple", 10),
            CartEntry::new("Oranges", 20),
            CartEntry::new("Banana", 30),
        ];

        let totals: Vec<(u64, Decimal)> = fold(&catalog, &cart)
            .iter()
            .map(|s| (s.total_quantity, s.total_amount))
            .collect();

        assert_eq!(
            totals,
            [
                (10, Decimal::from(1000)),
                (30, Decimal::from(1400)),
                (60, Decimal::from(1700)),
            ]
        );
    }

    #[test]
    fn test_fractional_prices_are_exact() {
        let prices = FlatPrice(Decimal::new(1, 1));
        let cart: Vec<CartEntry> = (0..10).map(|_| CartEntry::new("Dime", 1)).collect();

        let last = *fold(&prices, &cart).last().unwrap();
        assert_eq!(last.total_amount, Decimal::ONE);
        assert_eq!(last.total_quantity, 10);
    }

    #[test]
    fn test_zero_quantity_keeps_totals() {
        let catalog = Catalog::fruit_stand();
        let cart = [CartEntry::new("Banana", 3), CartEntry::new("Pineapple", 0)];

        let snapshots = fold(&catalog, &cart);
        assert!(snapshots[0].same_totals(&snapshots[1]));
    }

    #[test]
    fn test_totals_never_decrease() {
        let catalog = Catalog::fruit_stand();
        let cart: Vec<CartEntry> = ["Banana", "Pineapple", "Oranges", "Banana"]
            .iter()
            .zip([4, 0, 7, 1])
            .map(|(name, quantity)| CartEntry::new(*name, quantity))
            .collect();

        let snapshots = fold(&catalog, &cart);
        for pair in snapshots.windows(2) {
            assert!(pair[1].total_quantity >= pair[0].total_quantity);
            assert!(pair[1].total_amount >= pair[0].total_amount);
        }
        assert_eq!(snapshots.last().unwrap().total_quantity, 12);
    }

    #[rstest]
    #[case::unknown_item(CartEntry::new("Kiwi", 1), BillingError::item_not_found("Kiwi"))]
    #[case::empty_name(CartEntry::new("", 1), BillingError::empty_item_name(4))]
    #[case::blank_name(CartEntry::new("   ", 1), BillingError::empty_item_name(4))]
    #[case::negative_quantity(CartEntry::new("Banana", -2), BillingError::negative_quantity(4, -2))]
    fn test_step_rejects_entry(#[case] entry: CartEntry, #[case] expected: BillingError) {
        let catalog = Catalog::fruit_stand();
        let state = AccumulatorState::new();

        assert_eq!(state.step(&catalog, &entry, 4), Err(expected));
    }

    #[test]
    fn test_rejected_entry_leaves_state_untouched() {
        let catalog = Catalog::fruit_stand();
        let (state, _) = AccumulatorState::new()
            .step(&catalog, &CartEntry::new("Banana", 5), 1)
            .unwrap();

        assert!(state.step(&catalog, &CartEntry::new("Kiwi", 5), 2).is_err());
        assert_eq!(state.total_quantity(), 5);
        assert_eq!(state.total_amount(), Decimal::from(50));
    }

    #[test]
    fn test_amount_overflow_is_reported() {
        let prices = FlatPrice(Decimal::MAX);
        let state = AccumulatorState::new();

        assert_eq!(
            state.step(&prices, &CartEntry::new("Gold", 2), 1),
            Err(BillingError::arithmetic_overflow("Gold"))
        );
    }

    #[rstest]
    #[case::unit_price(Decimal::ONE)]
    #[case::free_item(Decimal::ZERO)]
    fn test_quantity_overflow_is_reported(#[case] price: Decimal) {
        let prices = FlatPrice(price);
        let bulk = CartEntry::new("Rice", i64::MAX);

        // Two maximal entries still fit in a u64 total
        let (state, _) = AccumulatorState::new().step(&prices, &bulk, 1).unwrap();
        let (state, snapshot) = state.step(&prices, &bulk, 2).unwrap();
        assert_eq!(snapshot.total_quantity, u64::MAX - 1);

        assert_eq!(
            state.step(&prices, &bulk, 3),
            Err(BillingError::arithmetic_overflow("Rice"))
        );
        assert_eq!(state.total_quantity(), u64::MAX - 1);
        assert_eq!(state.total_amount(), price * Decimal::from(u64::MAX - 1));
    }

    #[test]
    fn test_snapshot_kind() {
        let state = AccumulatorState::new();
        let snapshot = state.snapshot(BillKind::Final);

        assert_eq!(snapshot.kind, BillKind::Final);
        assert_eq!(snapshot.total_quantity, 0);
        assert_eq!(snapshot.total_amount, Decimal::ZERO);
    }
}
