//! The CLI's textual output, treated as a versioned contract.
//!
//! Every pattern the harness asserts on lives here. All app, user and key
//! names are escaped, so they always match literally.

use regex::escape;

/// `apps:create <app>`
pub fn app_created(app: &str) -> String {
    format!("created {}", escape(app))
}

/// `apps:create` inside a git checkout.
pub const GIT_REMOTE_ADDED: &str = "Git remote deis added";

/// `apps:create` inside a git checkout.
pub const REMOTE_AVAILABLE: &str = "remote available at ";

/// Printed on stderr by `git push deis master` once the build is released.
pub fn deployed(app: &str) -> String {
    format!(r"Done, {}:v\d+ deployed to Deis", escape(app))
}

/// `apps:destroy` and `destroy`.
pub fn destroying(app: &str) -> String {
    format!(r"Destroying {}\.\.\.", escape(app))
}

/// Completion line of `apps:destroy`.
pub const DONE_IN: &str = "done in ";

/// `ps:scale`
pub const SCALING: &str = r"Scaling processes\.\.\. but first,";

/// Completion line of `ps:scale`.
pub const SCALE_DONE: &str = r"done in \d+s";

/// `ps:restart`
pub const RESTARTING: &str = r"Restarting processes\.\.\. but first,";

/// `ps:list`, and the tail of `ps:scale` / `ps:restart`.
pub fn processes_header(app: &str) -> String {
    wfe_oracle::scrape::process_list_header(app)
}

/// `register`
pub fn registered(user: &str) -> String {
    format!(r"Registered {}\b", escape(user))
}

/// `register` and `login`
pub fn logged_in(user: &str) -> String {
    format!(r"Logged in as {}\b", escape(user))
}

/// Substring of the `register` error for an existing username.
pub const MUST_BE_UNIQUE: &str = "must be unique";

/// `auth:logout`
pub const LOGGED_OUT: &str = r"Logged out\n";

/// `auth:cancel`
pub const ACCOUNT_CANCELLED: &str = "Account cancelled";

/// `keys:add <path>/<key>.pub`
pub fn key_uploaded(key: &str) -> String {
    format!(r"Uploading {}\.pub to deis\.\.\. done", escape(key))
}

/// Lines of the `apps` listing that name a harness-created app.
pub const TEST_APP_LINE: &str = r"(?m)^\s*(test-[\w-]+)\s*$";

#[cfg(test)]
mod tests {
    use regex::Regex;

    use super::*;

    fn matches(pattern: &str, text: &str) -> bool {
        Regex::new(pattern).unwrap().is_match(text)
    }

    #[test]
    fn test_names_are_literal() {
        assert!(matches(&app_created("test-1"), "Creating Application... done, created test-1\n"));
        assert!(!matches(&app_created("a.b"), "created axb"));
        assert!(matches(&registered("test-7"), "Registered test-7\n"));
        assert!(!matches(&registered("test-7"), "Registered test-77\n"));
    }

    #[test]
    fn test_deploy_marker() {
        let stderr = "remote: -----> Launching...\nDone, test-1:v2 deployed to Deis\n";
        assert!(matches(&deployed("test-1"), stderr));
        assert!(!matches(&deployed("test-12"), stderr));
    }

    #[test]
    fn test_scale_lines() {
        assert!(matches(SCALING, "Scaling processes... but first, coffee!\n"));
        assert!(matches(SCALE_DONE, "done in 14s\n"));
        assert!(matches(RESTARTING, "Restarting processes... but first, coffee!\n"));
    }

    #[test]
    fn test_key_upload() {
        assert!(matches(
            &key_uploaded("deiskey-42"),
            "Uploading deiskey-42.pub to deis... done\n"
        ));
    }

    #[test]
    fn test_app_listing() {
        let listing = "=== Apps\ntest-abc-1\nmy-test-app\ntest-abc-2\n";
        let apps: Vec<&str> = Regex::new(TEST_APP_LINE)
            .unwrap()
            .captures_iter(listing)
            .map(|c| c.get(1).unwrap().as_str())
            .collect();
        assert_eq!(apps, vec!["test-abc-1", "test-abc-2"]);
    }
}
