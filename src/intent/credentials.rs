use std::env;

use crate::intent::{
    error::{ClassifierError, ClassifierErrorKind},
    types::{CredentialRef, ResolvedCredential},
};

/// Resolved once at startup; the result is immutable for the process lifetime.
pub fn resolve_credential(reference: &CredentialRef) -> Result<ResolvedCredential, ClassifierError> {
    match reference {
        CredentialRef::Env { var } => {
            let token = env::var(var).map_err(|_| {
                ClassifierError::new(
                    ClassifierErrorKind::InvalidConfig,
                    format!("missing credential environment variable {}", var),
                )
            })?;
            if token.trim().is_empty() {
                return Err(ClassifierError::new(
                    ClassifierErrorKind::InvalidConfig,
                    format!("credential environment variable {} is empty", var),
                ));
            }
            Ok(ResolvedCredential {
                api_key: Some(token),
            })
        }
        CredentialRef::InlineToken { token } => {
            if token.trim().is_empty() {
                return Err(ClassifierError::new(
                    ClassifierErrorKind::InvalidConfig,
                    "inline credential token cannot be empty",
                ));
            }
            Ok(ResolvedCredential {
                api_key: Some(token.clone()),
            })
        }
        CredentialRef::None => Ok(ResolvedCredential::none()),
    }
}
