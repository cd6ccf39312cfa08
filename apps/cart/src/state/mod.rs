//! # State Module
//!
//! Long-lived service state for the cart front ends.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │                    ┌──────────────────────────┐                         │
//! │                    │        CartState         │                         │
//! │                    │                          │                         │
//! │                    │  Mutex<Cart>             │                         │
//! │                    │  storage key             │                         │
//! │                    └────────────┬─────────────┘                         │
//! │          ┌──────────────────────┼──────────────────────┐                │
//! │          ▼                      ▼                      ▼                │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────┐       │
//! │  │ InventoryClient  │  │ PersistentStore  │  │    Notifier      │       │
//! │  │ (HTTP / static)  │  │ (SQLite / memory)│  │ (terminal / log) │       │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────┘       │
//! │                                                                         │
//! │  THREAD SAFETY:                                                         │
//! │  • CartState: tokio Mutex held across each whole operation              │
//! │  • Collaborators: shared as Arc<dyn Trait + Send + Sync>                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;

pub use cart::CartState;
