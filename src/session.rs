use std::rc::Rc;

use yew::prelude::*;

use crate::error::ApiError;

/// Who is using the app right now. Rebuilt by the reducer on every change, never mutated in
/// place, so each render sees one consistent snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    pub username: Option<String>,
    pub token: Option<String>,
    pub logged_in: bool,
}

pub enum SessionAction {
    /// Fresh token from login or register.
    SignedIn { username: String, token: String },
    /// A stored token passed `/auth/check-auth`.
    Verified { username: Option<String> },
    /// Logout, failed verification or a 401 anywhere.
    SignedOut,
}

impl Session {
    /// Starting point before verification: token known, user not yet trusted.
    pub fn with_stored_token(token: Option<String>) -> Self {
        Self {
            username: None,
            token,
            logged_in: false,
        }
    }
}

impl Reducible for Session {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            SessionAction::SignedIn { username, token } => Rc::new(Session {
                username: Some(username),
                token: Some(token),
                logged_in: true,
            }),
            SessionAction::Verified { username } => {
                if self.token.is_none() {
                    return self;
                }
                Rc::new(Session {
                    username,
                    token: self.token.clone(),
                    logged_in: true,
                })
            }
            SessionAction::SignedOut => Rc::new(Session::default()),
        }
    }
}

pub type SessionContext = UseReducerHandle<Session>;

/// What to do with a stored token once `/auth/check-auth` answered.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenCheck {
    Valid { username: Option<String> },
    /// Rejected by the backend; forget the token.
    Invalid,
    /// The check itself failed; stay logged out but keep the token for the next start.
    Unknown,
}

impl TokenCheck {
    pub fn from_result(result: Result<Option<String>, ApiError>) -> Self {
        match result {
            Ok(Some(username)) => TokenCheck::Valid {
                username: Some(username).filter(|name| !name.is_empty()),
            },
            Ok(None) | Err(ApiError::Unauthorized) | Err(ApiError::Status { status: 401 }) => {
                TokenCheck::Invalid
            }
            Err(_) => TokenCheck::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reduce(session: Session, action: SessionAction) -> Session {
        (*Rc::new(session).reduce(action)).clone()
    }

    #[test]
    fn sign_in_sets_token_and_flag_together() {
        let session = reduce(
            Session::default(),
            SessionAction::SignedIn {
                username: "wish".into(),
                token: "t0k".into(),
            },
        );
        assert!(session.logged_in);
        assert_eq!(session.token.as_deref(), Some("t0k"));
        assert_eq!(session.username.as_deref(), Some("wish"));
    }

    #[test]
    fn verification_requires_a_token() {
        let without = reduce(
            Session::default(),
            SessionAction::Verified {
                username: Some("ghost".into()),
            },
        );
        assert!(!without.logged_in);

        let with = reduce(
            Session::with_stored_token(Some("abc".into())),
            SessionAction::Verified {
                username: Some("wish".into()),
            },
        );
        assert!(with.logged_in);
        assert_eq!(with.token.as_deref(), Some("abc"));
    }

    #[test]
    fn token_check_outcomes() {
        assert_eq!(
            TokenCheck::from_result(Ok(Some("wish".into()))),
            TokenCheck::Valid {
                username: Some("wish".into())
            }
        );
        assert_eq!(
            TokenCheck::from_result(Ok(Some(String::new()))),
            TokenCheck::Valid { username: None }
        );
        assert_eq!(TokenCheck::from_result(Ok(None)), TokenCheck::Invalid);
        assert_eq!(
            TokenCheck::from_result(Err(ApiError::Status { status: 401 })),
            TokenCheck::Invalid
        );
        assert_eq!(
            TokenCheck::from_result(Err(ApiError::Network("offline".into()))),
            TokenCheck::Unknown
        );
        assert_eq!(
            TokenCheck::from_result(Err(ApiError::Status { status: 500 })),
            TokenCheck::Unknown
        );
    }

    #[test]
    fn sign_out_clears_everything() {
        let session = reduce(
            Session {
                username: Some("wish".into()),
                token: Some("abc".into()),
                logged_in: true,
            },
            SessionAction::SignedOut,
        );
        assert_eq!(session, Session::default());
    }
}
