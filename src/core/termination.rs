//! Conditions that stop a build early

use crate::models::{Dependencies, Package, Settings};

/// Predicate over the in-progress result. When any condition returns true
/// the whole build stops and the graph gathered so far is returned.
pub type Condition = Box<dyn Fn(&Dependencies) -> bool>;

/// Stop once `pkg` has been added to the graph
pub fn package_reached(pkg: impl Into<Package>) -> Condition {
    let pkg = pkg.into();
    Box::new(move |deps: &Dependencies| deps.contains(pkg.as_str()))
}

/// Stop once any of `packages` has been added to the graph
pub fn any_package_reached<I, P>(packages: I) -> Condition
where
    I: IntoIterator<Item = P>,
    P: Into<Package>,
{
    let targets: Vec<Package> = packages.into_iter().map(Into::into).collect();
    Box::new(move |deps: &Dependencies| targets.iter().any(|pkg| deps.contains(pkg.as_str())))
}

/// Stop once the graph holds at least `count` packages
pub fn node_count_at_least(count: usize) -> Condition {
    Box::new(move |deps: &Dependencies| deps.node_count() >= count)
}

/// Stop once any of `conditions` holds
pub fn any_of(conditions: Vec<Condition>) -> Condition {
    Box::new(move |deps: &Dependencies| conditions.iter().any(|condition| condition(deps)))
}

/// Conditions requested by `stop_at` and `max_packages`
pub fn from_settings(settings: &Settings) -> Vec<Condition> {
    let mut conditions = Vec::new();
    if !settings.stop_at.is_empty() {
        conditions.push(any_package_reached(settings.stop_at.clone()));
    }
    if let Some(max_packages) = settings.max_packages {
        conditions.push(node_count_at_least(max_packages));
    }
    conditions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deps_with(nodes: &[&str]) -> Dependencies {
        let mut deps = Dependencies::new();
        for node in nodes {
            deps.forward.node_mut(Package::from(*node));
        }
        deps
    }

    #[test]
    fn test_package_reached() {
        let condition = package_reached("example.com/target");
        assert!(!condition(&deps_with(&["example.com/app"])));
        assert!(condition(&deps_with(&["example.com/app", "example.com/target"])));
    }

    #[test]
    fn test_package_reached_uses_canonical_form() {
        let condition = package_reached("proj/vendor/lib/x");
        assert!(condition(&deps_with(&["lib/x"])));
    }

    #[test]
    fn test_any_package_reached() {
        let condition = any_package_reached(["a", "b"]);
        assert!(!condition(&deps_with(&["c"])));
        assert!(condition(&deps_with(&["c", "b"])));

        let never = any_package_reached(Vec::<String>::new());
        assert!(!never(&deps_with(&["a"])));
    }

    #[test]
    fn test_node_count_at_least() {
        let condition = node_count_at_least(2);
        assert!(!condition(&deps_with(&[])));
        assert!(!condition(&deps_with(&["a"])));
        assert!(condition(&deps_with(&["a", "b"])));
    }

    #[test]
    fn test_any_of() {
        let condition = any_of(vec![package_reached("x"), node_count_at_least(3)]);
        assert!(!condition(&deps_with(&["a"])));
        assert!(condition(&deps_with(&["x"])));
        assert!(condition(&deps_with(&["a", "b", "c"])));
        assert!(!any_of(Vec::new())(&deps_with(&["a"])));
    }

    #[test]
    fn test_from_settings() {
        assert!(from_settings(&Settings::default()).is_empty());

        let settings = Settings {
            stop_at: vec!["x".to_string()],
            max_packages: Some(5),
            ..Default::default()
        };
        let conditions = from_settings(&settings);
        assert_eq!(conditions.len(), 2);
        assert!(conditions[0](&deps_with(&["x"])));
        assert!(!conditions[1](&deps_with(&["x"])));
    }
}
