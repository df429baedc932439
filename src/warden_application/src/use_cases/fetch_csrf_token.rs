use warden_core::{Caller, CsrfError, CsrfToken, CsrfTokenProvider};

/// Fetch CSRF token use case - issues a token bound to the caller's session
pub struct FetchCsrfTokenUseCase<'a, P>
where
    P: CsrfTokenProvider,
{
    provider: &'a P,
}

impl<'a, P> FetchCsrfTokenUseCase<'a, P>
where
    P: CsrfTokenProvider,
{
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    #[tracing::instrument(name = "FetchCsrfTokenUseCase::execute", skip_all, fields(username = %caller.username()))]
    pub fn execute(&self, caller: &Caller) -> Result<CsrfToken, CsrfError> {
        self.provider.generate(caller.session_id())
    }
}
