//! Platform identifiers.
//!
//! Discord snowflakes are unsigned 64-bit integers while PostgreSQL only has signed
//! bigints, so every id carries a lossless `to_db`/`from_db` pair.

use serde::{Deserialize, Serialize};

/// Surrogate key of a role entry, assigned by the store on insert.
pub type EntryId = i32;

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
            derive_more::Display,
            derive_more::From,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Raw snowflake value.
            pub fn get(self) -> u64 {
                self.0
            }

            /// Bit-preserving conversion to a signed database column.
            pub fn to_db(self) -> i64 {
                self.0 as i64
            }

            /// Inverse of [`Self::to_db`].
            pub fn from_db(value: i64) -> Self {
                Self(value as u64)
            }
        }
    };
}

snowflake!(
    /// A guild (server).
    GuildId
);
snowflake!(
    /// A text channel.
    ChannelId
);
snowflake!(
    /// A message.
    MessageId
);
snowflake!(
    /// A guild role.
    RoleId
);
snowflake!(
    /// A user or guild member.
    UserId
);
