//! Container framing around the block stream.
//!
//! ## Container Structure
//!
//! ```text
//! +-------------------+
//! | Container_Header  | 16 bytes (optional)
//! +-------------------+
//! | Block(s)          | variable
//! +-------------------+
//! | Container_Footer  | 8 bytes (optional)
//! +-------------------+
//! ```
//!
//! Whether the header and footer are present is not recorded in the stream:
//! both sides must agree on the [`OutputShape`](sallos_core::OutputShape).

mod footer;
mod header;

pub use footer::ContainerFooter;
pub use header::ContainerHeader;

use sallos_core::FormatVersion;

/// Format version written into every container header.
pub const FORMAT_VERSION: FormatVersion = FormatVersion::new(0, 1, 0);

/// Size of the container header.
pub const CONTAINER_HEADER_SIZE: usize = 16;

/// Size of the container footer.
pub const CONTAINER_FOOTER_SIZE: usize = 8;
