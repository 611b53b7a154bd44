//! # Remote Event Provider
//!
//! Queries a today event server over HTTP. The server exposes a single
//! endpoint, `GET <base>/api/v1/events?date=MM-DD`, answering with a JSON
//! array of [`EventRecord`]s.
//!
//! ## Example
//!
//! ```no_run
//! use today_core::provider::EventProvider;
//! use today_core::MonthDay;
//! use today_remote::RemoteEventProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = RemoteEventProvider::new("https://todayserver-89bb2a1b2e80.herokuapp.com/")?;
//!     let events = provider.events_of_date(MonthDay::new(12, 6)?).await;
//!     println!("{} events", events.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod provider;
pub mod record;

pub use error::RemoteError;
pub use provider::{DEFAULT_IDENTIFIER, RemoteEventProvider};
pub use record::EventRecord;
