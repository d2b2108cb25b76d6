//! Integer ids for registry rows.
//!
//! The registry hands back numeric row ids for the collections it owns.
//! Each collection gets its own wrapper type, so a slide id can never be
//! routed to a post endpoint by accident. Ids serialize as bare integers,
//! matching the wire format.

use serde::{Deserialize, Serialize};

macro_rules! registry_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw registry row id.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// The raw row id.
            #[must_use]
            pub const fn raw(self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

registry_id! {
    /// Row id of a registration application.
    ApplicationId
}

registry_id! {
    /// Row id of a news/content post.
    PostId
}

registry_id! {
    /// Row id of a homepage slide.
    SlideId
}
