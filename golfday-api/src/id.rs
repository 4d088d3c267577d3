use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! id {
    ($name:ident, $id:ty) => {
        #[derive(
            Copy,
            Clone,
            Debug,
            Default,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
        )]
        #[repr(transparent)]
        #[serde(transparent)]
        pub struct $name(pub $id);

        impl Display for $name {
            #[inline]
            fn fmt(&self, f: &mut Formatter) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl AsRef<$id> for $name {
            #[inline]
            fn as_ref(&self) -> &$id {
                &self.0
            }
        }

        impl PartialEq<$id> for $name {
            #[inline]
            fn eq(&self, other: &$id) -> bool {
                self.0 == *other
            }
        }

        impl From<$id> for $name {
            #[inline]
            fn from(id: $id) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = <$id as FromStr>::Err;

            #[inline]
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse::<$id>()?))
            }
        }
    };
}

id!(UserId, u64);
id!(TournamentId, u64);
id!(EntrantId, u64);
id!(MatchId, u64);
id!(RecordId, u64);
id!(TeamId, u64);
id!(PhotoId, u64);

#[cfg(test)]
mod tests {
    use super::{TournamentId, UserId};

    use serde_test::{assert_tokens, Token};

    #[test]
    fn test_id_serde_transparent() {
        // Ids serialize as their bare integer, not a wrapping struct.
        assert_tokens(&UserId(0), &[Token::U64(0)]);
        assert_tokens(&UserId(1334), &[Token::U64(1334)]);
        assert_tokens(&TournamentId(u64::MAX), &[Token::U64(u64::MAX)]);
    }

    #[test]
    fn test_id_parse() {
        assert_eq!("123".parse::<UserId>().unwrap(), UserId(123));
        assert_eq!(UserId(123).to_string(), "123");

        "".parse::<UserId>().unwrap_err();
        "-1".parse::<UserId>().unwrap_err();
        "abc".parse::<UserId>().unwrap_err();
    }
}
