/// Client-side navigation sink used for the login redirect.
pub trait Navigator: Send + Sync {
    fn redirect(&self, path: &str);
}
