use super::errors::CredentialError;
use super::storage::CredentialStore;

/// Verify a submitted password against the stored admin credential.
///
/// Returns `Ok(false)` when no credential row exists - the live path never
/// provisions a default password (fail-closed).
pub(crate) async fn verify_admin_password(password: &str) -> Result<bool, CredentialError> {
    let Some(credential) = CredentialStore::get_credential().await? else {
        tracing::warn!("Admin credential is not provisioned; rejecting login");
        return Ok(false);
    };

    Ok(bcrypt::verify(password, &credential.password_hash)?)
}

/// Change the admin password after re-verifying the current one.
///
/// The caller layer validates length and confirmation; this function only
/// guards against a wrong current password and performs the singleton update.
pub(crate) async fn change_admin_password(
    current_password: &str,
    new_password: &str,
) -> Result<(), CredentialError> {
    if !verify_admin_password(current_password).await? {
        return Err(CredentialError::WrongCurrentPassword);
    }

    let hash = bcrypt::hash(new_password, bcrypt::DEFAULT_COST)?;
    CredentialStore::update_password_hash(&hash).await
}

/// Provision the credential from ADMIN_BOOTSTRAP_PASSWORD when the table is
/// empty. Called from init() only, never from a request path.
pub(crate) async fn bootstrap_admin_password() -> Result<(), CredentialError> {
    let Ok(bootstrap_password) = std::env::var("ADMIN_BOOTSTRAP_PASSWORD") else {
        return Ok(());
    };

    if CredentialStore::get_credential().await?.is_some() {
        tracing::debug!("Admin credential already provisioned; ignoring bootstrap password");
        return Ok(());
    }

    let hash = bcrypt::hash(&bootstrap_password, bcrypt::DEFAULT_COST)?;
    CredentialStore::insert_credential(&hash).await?;
    tracing::info!("Provisioned admin credential from ADMIN_BOOTSTRAP_PASSWORD");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::init_test_environment;
    use serial_test::serial;

    async fn provision(password: &str) {
        let hash = bcrypt::hash(password, 4).unwrap();
        match CredentialStore::get_credential().await.unwrap() {
            Some(_) => CredentialStore::update_password_hash(&hash).await.unwrap(),
            None => CredentialStore::insert_credential(&hash).await.unwrap(),
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_verify_fails_closed_without_credential() {
        init_test_environment().await;
        CredentialStore::delete_credential().await.unwrap();

        // No row provisioned: verification must reject, not auto-provision
        assert!(!verify_admin_password("anything").await.unwrap());
        assert!(CredentialStore::get_credential().await.unwrap().is_none());
    }

    #[tokio::test]
    #[serial]
    async fn test_verify_correct_password() {
        init_test_environment().await;
        provision("correct horse").await;

        assert!(verify_admin_password("correct horse").await.unwrap());
    }

    #[tokio::test]
    #[serial]
    async fn test_verify_wrong_password_does_not_mutate() {
        init_test_environment().await;
        provision("correct horse").await;

        let before = CredentialStore::get_credential().await.unwrap().unwrap();

        assert!(!verify_admin_password("battery staple").await.unwrap());
        assert!(!verify_admin_password("battery staple").await.unwrap());

        let after = CredentialStore::get_credential().await.unwrap().unwrap();
        assert_eq!(before.password_hash, after.password_hash);
        assert_eq!(before.updated_at, after.updated_at);
    }

    #[tokio::test]
    #[serial]
    async fn test_change_password_wrong_current_leaves_hash_intact() {
        init_test_environment().await;
        provision("old password").await;

        let before = CredentialStore::get_credential().await.unwrap().unwrap();

        let result = change_admin_password("not the password", "new password").await;
        assert!(matches!(result, Err(CredentialError::WrongCurrentPassword)));

        let after = CredentialStore::get_credential().await.unwrap().unwrap();
        assert_eq!(before.password_hash, after.password_hash);
    }

    #[tokio::test]
    #[serial]
    async fn test_change_password_success() {
        init_test_environment().await;
        provision("old password").await;

        change_admin_password("old password", "new password")
            .await
            .unwrap();

        assert!(!verify_admin_password("old password").await.unwrap());
        assert!(verify_admin_password("new password").await.unwrap());
    }
}
