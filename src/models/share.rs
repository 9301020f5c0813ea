//! Read-only share links for a user's timetable.
//!
//! A share link is a 32-hex-char token plus a 4-digit access code. Links can
//! expire, carry a visit cap, be disabled by their owner, and restrict which
//! course fields the viewer sees.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::UserId;

/// Course fields a share link may expose to viewers.
///
/// `note` is intentionally not shareable.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayField {
    Name,
    Teacher,
    Room,
    Weeks,
}

/// How the share page picks the timezone it renders clocks in.
///
/// Week and weekday computation always uses the document's own timezone;
/// this only affects display.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TzMode {
    /// Viewer's browser decides.
    #[default]
    ClientDynamic,
    /// Pinned to `tz_value` for every viewer.
    ClientFixed,
    /// Owner-chosen custom zone in `tz_value`.
    Custom,
}

/// Why a share-link access attempt was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShareAccessError {
    #[error("share token must be 32 hex characters")]
    MalformedToken,
    #[error("share link has been disabled")]
    Disabled,
    #[error("share link has expired")]
    Expired,
    #[error("share link reached its visit cap")]
    VisitCapReached,
    #[error("a 4-digit access code is required")]
    PassRequired,
    #[error("wrong access code")]
    WrongPass,
}

/// A published read-only view of one user's timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedLink {
    /// 32 lowercase hex characters.
    pub token: String,
    pub user_id: UserId,
    /// 4-digit access code viewers must present.
    pub share_pass: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub max_visits: Option<u32>,
    #[serde(default)]
    pub visit_count: u32,
    #[serde(default)]
    pub disabled: bool,
    /// Course fields exposed to viewers.
    pub display_fields: Vec<DisplayField>,
    #[serde(default)]
    pub tz_mode: TzMode,
    #[serde(default)]
    pub tz_value: Option<Tz>,
    pub created_at: DateTime<Utc>,
}

impl SharedLink {
    /// Mint a new link with a fresh random token.
    pub fn new(
        user_id: UserId,
        share_pass: String,
        display_fields: Vec<DisplayField>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let display_fields = if display_fields.is_empty() {
            Self::default_display_fields()
        } else {
            display_fields
        };
        Self {
            token: Uuid::new_v4().simple().to_string(),
            user_id,
            share_pass,
            expires_at: None,
            max_visits: None,
            visit_count: 0,
            disabled: false,
            display_fields,
            tz_mode: TzMode::default(),
            tz_value: None,
            created_at,
        }
    }

    /// Fields shown when the owner picked none explicitly.
    pub fn default_display_fields() -> Vec<DisplayField> {
        vec![DisplayField::Name, DisplayField::Teacher, DisplayField::Room]
    }

    /// Whether a string has the shape of a share token.
    pub fn is_token_format(s: &str) -> bool {
        s.len() == 32 && s.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase())
    }

    /// Whether a string is a valid 4-digit access code.
    pub fn is_pass_format(s: &str) -> bool {
        s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit())
    }

    /// Gate an access attempt: link liveness first, then the access code.
    ///
    /// `pass = None` means the viewer has not entered a code yet; the caller
    /// should prompt rather than treat it as a wrong code.
    pub fn check_access(&self, now: DateTime<Utc>, pass: Option<&str>) -> Result<(), ShareAccessError> {
        if self.disabled {
            return Err(ShareAccessError::Disabled);
        }
        if let Some(expires_at) = self.expires_at {
            if now > expires_at {
                return Err(ShareAccessError::Expired);
            }
        }
        if let Some(max) = self.max_visits {
            if self.visit_count >= max {
                return Err(ShareAccessError::VisitCapReached);
            }
        }
        match pass {
            None => Err(ShareAccessError::PassRequired),
            Some(p) if !Self::is_pass_format(p) || p != self.share_pass => {
                Err(ShareAccessError::WrongPass)
            }
            Some(_) => Ok(()),
        }
    }

    /// Timezone the share page should render clocks in, given the owning
    /// document's recurrence timezone.
    pub fn display_tz(&self, timetable_tz: Tz) -> Tz {
        match self.tz_mode {
            TzMode::ClientFixed | TzMode::Custom => self.tz_value.unwrap_or(timetable_tz),
            TzMode::ClientDynamic => timetable_tz,
        }
    }

    /// Whether this link exposes the given course field.
    pub fn shows(&self, field: DisplayField) -> bool {
        self.display_fields.contains(&field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn link() -> SharedLink {
        SharedLink::new(
            UserId::new(1001),
            "1234".to_string(),
            Vec::new(),
            Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_token_shape() {
        let l = link();
        assert!(SharedLink::is_token_format(&l.token));
        assert!(!SharedLink::is_token_format("short"));
        assert!(!SharedLink::is_token_format(&"Z".repeat(32)));
    }

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(link().token, link().token);
    }

    #[test]
    fn test_default_display_fields() {
        let l = link();
        assert!(l.shows(DisplayField::Name));
        assert!(l.shows(DisplayField::Teacher));
        assert!(l.shows(DisplayField::Room));
        assert!(!l.shows(DisplayField::Weeks));
    }

    #[test]
    fn test_access_requires_pass() {
        let l = link();
        let now = l.created_at;
        assert_eq!(l.check_access(now, None), Err(ShareAccessError::PassRequired));
        assert_eq!(
            l.check_access(now, Some("0000")),
            Err(ShareAccessError::WrongPass)
        );
        assert_eq!(
            l.check_access(now, Some("12345")),
            Err(ShareAccessError::WrongPass)
        );
        assert_eq!(l.check_access(now, Some("1234")), Ok(()));
    }

    #[test]
    fn test_access_disabled_link() {
        let mut l = link();
        l.disabled = true;
        assert_eq!(
            l.check_access(l.created_at, Some("1234")),
            Err(ShareAccessError::Disabled)
        );
    }

    #[test]
    fn test_access_expiry() {
        let mut l = link();
        l.expires_at = Some(Utc.with_ymd_and_hms(2024, 9, 2, 0, 0, 0).unwrap());
        let before = Utc.with_ymd_and_hms(2024, 9, 1, 23, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 9, 2, 0, 0, 1).unwrap();
        assert_eq!(l.check_access(before, Some("1234")), Ok(()));
        assert_eq!(
            l.check_access(after, Some("1234")),
            Err(ShareAccessError::Expired)
        );
    }

    #[test]
    fn test_access_visit_cap() {
        let mut l = link();
        l.max_visits = Some(2);
        l.visit_count = 1;
        assert_eq!(l.check_access(l.created_at, Some("1234")), Ok(()));
        l.visit_count = 2;
        assert_eq!(
            l.check_access(l.created_at, Some("1234")),
            Err(ShareAccessError::VisitCapReached)
        );
    }

    #[test]
    fn test_display_tz_modes() {
        let mut l = link();
        assert_eq!(l.display_tz(chrono_tz::Asia::Shanghai), chrono_tz::Asia::Shanghai);

        l.tz_mode = TzMode::Custom;
        l.tz_value = Some(chrono_tz::Europe::Berlin);
        assert_eq!(l.display_tz(chrono_tz::Asia::Shanghai), chrono_tz::Europe::Berlin);

        l.tz_value = None;
        assert_eq!(l.display_tz(chrono_tz::Asia::Shanghai), chrono_tz::Asia::Shanghai);
    }
}
