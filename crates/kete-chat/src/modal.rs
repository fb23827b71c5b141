//! Order confirmation modal.
//!
//! Two states, cycling for the whole session:
//! Closed -> Open (an order arrives)
//! Open -> Open (a newer order replaces the content)
//! Open -> Closed (the user dismisses or confirms)
//!
//! Incoming data never closes the modal.

use kete_core::types::OrderDescriptor;

/// What the modal shows.
///
/// `Open` always carries its content, so an open modal without an order
/// cannot be represented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    Open(OrderDescriptor),
}

/// Modal state without its payload, for the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalPhase {
    Closed,
    Open,
}

/// What can move the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalTrigger {
    /// A response carried a non-blank order.
    OrderReceived,
    /// The user dismissed or confirmed the dialog.
    UserClosed,
}

/// Phase reached from `from` on `trigger`, or `None` when the trigger does
/// not apply (closing an already closed modal).
pub fn next_phase(from: ModalPhase, trigger: ModalTrigger) -> Option<ModalPhase> {
    match (from, trigger) {
        (_, ModalTrigger::OrderReceived) => Some(ModalPhase::Open),
        (ModalPhase::Open, ModalTrigger::UserClosed) => Some(ModalPhase::Closed),
        (ModalPhase::Closed, ModalTrigger::UserClosed) => None,
    }
}

/// The order modal owned by a chat session.
#[derive(Debug, Clone, Default)]
pub struct OrderModal {
    state: ModalState,
}

impl OrderModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn phase(&self) -> ModalPhase {
        match self.state {
            ModalState::Closed => ModalPhase::Closed,
            ModalState::Open(_) => ModalPhase::Open,
        }
    }

    pub fn is_open(&self) -> bool {
        self.phase() == ModalPhase::Open
    }

    /// The order on display, if the modal is open.
    pub fn content(&self) -> Option<&OrderDescriptor> {
        match &self.state {
            ModalState::Open(order) => Some(order),
            ModalState::Closed => None,
        }
    }

    /// Show `order`, replacing whatever was shown before.
    pub(crate) fn open(&mut self, order: OrderDescriptor) {
        if next_phase(self.phase(), ModalTrigger::OrderReceived).is_some() {
            self.state = ModalState::Open(order);
        }
    }

    /// Close the modal, handing back the order it showed.
    ///
    /// Returns `None` if it was already closed.
    pub(crate) fn close(&mut self) -> Option<OrderDescriptor> {
        next_phase(self.phase(), ModalTrigger::UserClosed)?;
        match std::mem::take(&mut self.state) {
            ModalState::Open(order) => Some(order),
            ModalState::Closed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(text: &str) -> OrderDescriptor {
        OrderDescriptor::new(text).unwrap()
    }

    // =====================================================================
    // Transition table
    // =====================================================================

    #[test]
    fn test_closed_to_open_on_order() {
        assert_eq!(
            next_phase(ModalPhase::Closed, ModalTrigger::OrderReceived),
            Some(ModalPhase::Open)
        );
    }

    #[test]
    fn test_open_stays_open_on_order() {
        assert_eq!(
            next_phase(ModalPhase::Open, ModalTrigger::OrderReceived),
            Some(ModalPhase::Open)
        );
    }

    #[test]
    fn test_open_to_closed_on_user_close() {
        assert_eq!(
            next_phase(ModalPhase::Open, ModalTrigger::UserClosed),
            Some(ModalPhase::Closed)
        );
    }

    #[test]
    fn test_closed_ignores_user_close() {
        assert_eq!(next_phase(ModalPhase::Closed, ModalTrigger::UserClosed), None);
    }

    #[test]
    fn test_no_trigger_leads_to_closed_except_user_close() {
        for from in [ModalPhase::Closed, ModalPhase::Open] {
            assert_ne!(
                next_phase(from, ModalTrigger::OrderReceived),
                Some(ModalPhase::Closed)
            );
        }
    }

    // =====================================================================
    // OrderModal
    // =====================================================================

    #[test]
    fn test_initial_state_is_closed() {
        let modal = OrderModal::new();
        assert!(!modal.is_open());
        assert_eq!(modal.state(), &ModalState::Closed);
        assert!(modal.content().is_none());
    }

    #[test]
    fn test_open_sets_content() {
        let mut modal = OrderModal::new();
        modal.open(order("Order #123"));
        assert!(modal.is_open());
        assert_eq!(modal.content().unwrap().as_str(), "Order #123");
    }

    #[test]
    fn test_second_order_replaces_content() {
        let mut modal = OrderModal::new();
        modal.open(order("Order #1"));
        modal.open(order("Order #2"));
        assert_eq!(modal.content().unwrap().as_str(), "Order #2");
    }

    #[test]
    fn test_close_returns_order() {
        let mut modal = OrderModal::new();
        modal.open(order("Order #123"));
        let closed = modal.close();
        assert_eq!(closed.unwrap().as_str(), "Order #123");
        assert!(!modal.is_open());
        assert_eq!(modal.phase(), ModalPhase::Closed);
    }

    #[test]
    fn test_close_when_closed_is_noop() {
        let mut modal = OrderModal::new();
        assert!(modal.close().is_none());
        assert!(!modal.is_open());
    }

    #[test]
    fn test_modal_cycles() {
        let mut modal = OrderModal::new();
        for i in 0..3 {
            modal.open(order(&format!("Order #{}", i)));
            assert!(modal.is_open());
            assert!(modal.close().is_some());
            assert!(!modal.is_open());
        }
    }
}
