//! Billable product lines on the session note.

use tracing::debug;

use super::{DraftError, ItemKind, SessionDraft};
use crate::models::BudgetItem;

/// A budget item used during the session.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductLine {
    budget_item_id: i64,
    product_code: String,
    product_description: String,
    quantity: f64,
    unit_price: f64,
    available_quantity: f64,
}

impl ProductLine {
    pub const fn budget_item_id(&self) -> i64 {
        self.budget_item_id
    }

    pub fn product_code(&self) -> &str {
        &self.product_code
    }

    pub fn product_description(&self) -> &str {
        &self.product_description
    }

    pub const fn quantity(&self) -> f64 {
        self.quantity
    }

    pub const fn unit_price(&self) -> f64 {
        self.unit_price
    }

    /// Units remaining on the plan when the line was added. Client-side only.
    pub const fn available_quantity(&self) -> f64 {
        self.available_quantity
    }

    /// `quantity * unit_price`.
    pub fn line_total(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

impl SessionDraft {
    /// Add a product line for `quantity` units of `item`.
    ///
    /// # Errors
    ///
    /// - `InvalidQuantity` if `quantity` is not in `(0, item.quantity]`
    /// - `AlreadySelected` if the item id or code is already on the note
    pub fn add_product(&mut self, item: &BudgetItem, quantity: f64) -> Result<usize, DraftError> {
        let available = item.quantity;
        if quantity.is_nan() || quantity <= 0.0 || quantity > available {
            return Err(DraftError::InvalidQuantity {
                requested: quantity,
                available,
            });
        }

        let products = &mut self.note.products;
        if products
            .iter()
            .any(|p| p.budget_item_id == item.id || p.product_code == item.item_code)
        {
            return Err(DraftError::already_selected(
                ItemKind::Product,
                &item.item_code,
            ));
        }

        products.push(ProductLine {
            budget_item_id: item.id,
            product_code: item.item_code.clone(),
            product_description: item.description.clone(),
            quantity,
            unit_price: item.unit_price,
            available_quantity: available,
        });
        debug!(
            draft_id = %self.draft_id,
            budget_item_id = item.id,
            quantity,
            "product added"
        );
        Ok(products.len() - 1)
    }

    /// Change a line's quantity by `delta`. The result never drops below one
    /// unit. Returns the new quantity.
    ///
    /// # Errors
    ///
    /// - `NotFound` if `product_index` is out of range
    /// - `LimitReached` if the result would exceed the availability snapshot
    pub fn adjust_product_quantity(
        &mut self,
        product_index: usize,
        delta: f64,
    ) -> Result<f64, DraftError> {
        let line = self
            .note
            .products
            .get_mut(product_index)
            .ok_or_else(|| DraftError::not_found(ItemKind::Product, product_index))?;

        let next = (line.quantity + delta).max(1.0);
        if next > line.available_quantity {
            return Err(DraftError::LimitReached {
                kind: ItemKind::Product,
                limit: line.available_quantity,
            });
        }

        line.quantity = next;
        Ok(next)
    }

    /// # Errors
    ///
    /// `NotFound` if `product_index` is out of range.
    pub fn remove_product(&mut self, product_index: usize) -> Result<ProductLine, DraftError> {
        if product_index >= self.note.products.len() {
            return Err(DraftError::not_found(ItemKind::Product, product_index));
        }
        Ok(self.note.products.remove(product_index))
    }

    /// Sum of `quantity * unit_price` over all product lines.
    pub fn total_product_value(&self) -> f64 {
        self.note.products.iter().map(ProductLine::line_total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::ReasonCode;

    fn therapy_item() -> BudgetItem {
        BudgetItem {
            id: 9001,
            budget_settings_id: 1,
            client_id: 1,
            item_code: "THERAPY-001".to_string(),
            description: "Speech therapy hour".to_string(),
            quantity: 10.0,
            unit_price: 150.0,
        }
    }

    fn kit_item() -> BudgetItem {
        BudgetItem {
            id: 9002,
            budget_settings_id: 1,
            client_id: 1,
            item_code: "KIT-002".to_string(),
            description: "Sensory kit".to_string(),
            quantity: 2.0,
            unit_price: 35.5,
        }
    }

    #[test]
    fn test_add_product_and_total() {
        let mut draft = SessionDraft::for_client(1);
        draft.add_product(&therapy_item(), 3.0).unwrap();

        let line = &draft.note.products()[0];
        assert!((line.quantity() - 3.0).abs() < f64::EPSILON);
        assert!((line.unit_price() - 150.0).abs() < f64::EPSILON);
        assert!((draft.total_product_value() - 450.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_add_product_over_available_is_rejected() {
        let mut draft = SessionDraft::for_client(1);
        draft.add_product(&therapy_item(), 3.0).unwrap();
        let snapshot = draft.clone();

        let err = draft.add_product(&therapy_item(), 11.0).unwrap_err();

        assert_eq!(err.code(), ReasonCode::InvalidQuantity);
        assert_eq!(draft, snapshot);
    }

    #[test]
    fn test_add_product_rejects_non_positive() {
        let mut draft = SessionDraft::for_client(1);
        for qty in [0.0, -1.0, f64::NAN] {
            let err = draft.add_product(&therapy_item(), qty).unwrap_err();
            assert_eq!(err.code(), ReasonCode::InvalidQuantity);
        }
        assert!(draft.note.products().is_empty());
    }

    #[test]
    fn test_add_product_duplicate_by_id_or_code() {
        let mut draft = SessionDraft::for_client(1);
        draft.add_product(&therapy_item(), 1.0).unwrap();

        let err = draft.add_product(&therapy_item(), 1.0).unwrap_err();
        assert_eq!(err.code(), ReasonCode::AlreadySelected);

        let mut same_code = kit_item();
        same_code.item_code = "THERAPY-001".to_string();
        let err = draft.add_product(&same_code, 1.0).unwrap_err();
        assert_eq!(err.code(), ReasonCode::AlreadySelected);
        assert_eq!(draft.note.products().len(), 1);
    }

    #[test]
    fn test_adjust_quantity_bounds() {
        let mut draft = SessionDraft::for_client(1);
        draft.add_product(&kit_item(), 1.0).unwrap();

        assert!((draft.adjust_product_quantity(0, 1.0).unwrap() - 2.0).abs() < f64::EPSILON);

        let err = draft.adjust_product_quantity(0, 1.0).unwrap_err();
        assert_eq!(err.code(), ReasonCode::LimitReached);
        assert!((draft.note.products()[0].quantity() - 2.0).abs() < f64::EPSILON);

        assert!((draft.adjust_product_quantity(0, -5.0).unwrap() - 1.0).abs() < f64::EPSILON);
        assert!((draft.total_product_value() - 35.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_remove_product_updates_total() {
        let mut draft = SessionDraft::for_client(1);
        draft.add_product(&therapy_item(), 2.0).unwrap();
        draft.add_product(&kit_item(), 2.0).unwrap();
        assert!((draft.total_product_value() - 371.0).abs() < f64::EPSILON);

        let removed = draft.remove_product(0).unwrap();
        assert_eq!(removed.product_code(), "THERAPY-001");
        assert!((draft.total_product_value() - 71.0).abs() < f64::EPSILON);

        assert_eq!(
            draft.remove_product(4).unwrap_err().code(),
            ReasonCode::NotFound
        );
    }
}
