//! User-facing notices for cart outcomes.
//!
//! The store only returns results; front ends turn them into a [`Notice`]
//! and decide how to show it.

use serde::Serialize;

use super::CartError;

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
    Neutral,
}

/// The cart operation a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartOperation {
    Add,
    Remove,
    UpdateAmount,
}

/// Messages shown to shoppers.
pub mod messages {
    pub const ADDED: &str = "Produto adicionado.";
    pub const REMOVED: &str = "Produto removido.";
    pub const UPDATED: &str = "Produto atualizado.";
    pub const OUT_OF_STOCK: &str = "Quantidade solicitada fora de estoque";
    pub const ADD_FAILED: &str = "Erro na adição do produto";
    pub const REMOVE_FAILED: &str = "Erro na remoção do produto";
    pub const UPDATE_FAILED: &str = "Erro na alteração de quantidade do produto";
}

/// A severity and a fixed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: &'static str,
}

impl Notice {
    const fn new(level: NoticeLevel, message: &'static str) -> Self {
        Self { level, message }
    }

    /// Notice for a successful operation.
    #[must_use]
    pub const fn success(operation: CartOperation) -> Self {
        match operation {
            CartOperation::Add => Self::new(NoticeLevel::Success, messages::ADDED),
            CartOperation::Remove => Self::new(NoticeLevel::Neutral, messages::REMOVED),
            CartOperation::UpdateAmount => Self::new(NoticeLevel::Neutral, messages::UPDATED),
        }
    }

    /// Notice for a failed operation.
    ///
    /// Out-of-stock gets its own message; everything else gets the
    /// operation's generic failure message.
    #[must_use]
    pub const fn failure(operation: CartOperation, error: &CartError) -> Self {
        if matches!(error, CartError::OutOfStock { .. }) {
            return Self::new(NoticeLevel::Error, messages::OUT_OF_STOCK);
        }
        Self::generic_failure(operation)
    }

    /// The operation's generic failure notice, for failures that never
    /// reached the store (such as an unreadable request).
    #[must_use]
    pub const fn generic_failure(operation: CartOperation) -> Self {
        let message = match operation {
            CartOperation::Add => messages::ADD_FAILED,
            CartOperation::Remove => messages::REMOVE_FAILED,
            CartOperation::UpdateAmount => messages::UPDATE_FAILED,
        };
        Self::new(NoticeLevel::Error, message)
    }

    /// Notice for any operation result.
    #[must_use]
    pub const fn for_result<T>(operation: CartOperation, result: &Result<T, CartError>) -> Self {
        match result {
            Ok(_) => Self::success(operation),
            Err(error) => Self::failure(operation, error),
        }
    }
}
