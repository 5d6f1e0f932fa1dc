use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("registry error: {0}")]
    Registry(#[from] cairn_registry::RegistryError),

    #[error("pin error: {0}")]
    Pin(#[from] cairn_pin::PinError),

    #[error("store error: {0}")]
    Store(#[from] cairn_store::StoreError),

    #[error("ledger error: {0}")]
    Ledger(#[from] cairn_ledger::LedgerError),
}

pub type SdkResult<T> = Result<T, SdkError>;
