use super::backend::{ClientResult, CmsBackend, CurrentUser};

/// Who is logged in, as far as this client knows.
#[derive(Debug, Clone, Default)]
pub struct AuthSession {
    user: Option<CurrentUser>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Asks the server; any failure means "logged out".
    pub async fn fetch_user(&mut self, backend: &dyn CmsBackend) -> Option<CurrentUser> {
        self.user = backend.me().await.ok();
        self.user.clone()
    }

    pub async fn login(
        &mut self,
        backend: &dyn CmsBackend,
        email: &str,
        password: &str,
    ) -> ClientResult<CurrentUser> {
        let user = backend.login(email, password).await?;
        self.user = Some(user.clone());
        Ok(user)
    }

    pub async fn logout(&mut self, backend: &dyn CmsBackend) -> ClientResult<()> {
        backend.logout().await?;
        self.user = None;
        Ok(())
    }
}
