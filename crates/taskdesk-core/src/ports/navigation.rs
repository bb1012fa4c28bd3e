/// Entry points the view layer can be sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
}

/// Navigation sink implemented by the view layer.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}
