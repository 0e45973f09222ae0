/// Identity evaluating visibility of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Viewer {
    #[default]
    Anonymous,
    User(i64),
}

impl Viewer {
    pub(crate) fn user_id(&self) -> Option<i64> {
        match self {
            Viewer::Anonymous => None,
            Viewer::User(id) => Some(*id),
        }
    }

    pub(crate) fn is(&self, user_id: i64) -> bool {
        self.user_id() == Some(user_id)
    }
}

impl From<Option<i64>> for Viewer {
    fn from(user_id: Option<i64>) -> Self {
        user_id.map_or(Viewer::Anonymous, Viewer::User)
    }
}

#[cfg(test)]
mod tests {
    use super::Viewer;

    #[test]
    fn anonymous_is_nobody() {
        assert!(!Viewer::Anonymous.is(1));
        assert_eq!(Viewer::Anonymous.user_id(), None);
    }

    #[test]
    fn user_matches_only_itself() {
        let viewer = Viewer::User(7);
        assert!(viewer.is(7));
        assert!(!viewer.is(8));
    }

    #[test]
    fn from_option_maps_none_to_anonymous() {
        assert_eq!(Viewer::from(None), Viewer::Anonymous);
        assert_eq!(Viewer::from(Some(3)), Viewer::User(3));
    }
}
