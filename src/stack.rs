//! Prisma Cloud stacks and their console/API hostnames.

use clap::ValueEnum;

const GLOBAL_DOMAIN: &str = "prismacloud.io";
const CHINA_CONSOLE_HOST: &str = "app.prismacloud.cn";
const CHINA_API_HOST: &str = "api.prismacloud.cn";

/// A regional deployment of the Prisma Cloud service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Stack {
    #[value(name = "app")]
    App,
    #[value(name = "app2")]
    App2,
    #[value(name = "app3")]
    App3,
    #[value(name = "app4")]
    App4,
    #[value(name = "app.gov")]
    Gov,
    #[value(name = "app.cn")]
    China,
    #[value(name = "app.sg")]
    Singapore,
    #[value(name = "app.eu")]
    Europe,
    #[value(name = "app2.eu")]
    Europe2,
    #[value(name = "app.ca")]
    Canada,
    #[value(name = "app.anz")]
    Anz,
    #[value(name = "app.uk")]
    UnitedKingdom,
}

impl Stack {
    /// All stacks, in the order they are listed by `--print` and `--help`.
    pub const ALL: [Stack; 12] = [
        Stack::App,
        Stack::App2,
        Stack::App3,
        Stack::App4,
        Stack::Gov,
        Stack::China,
        Stack::Singapore,
        Stack::Europe,
        Stack::Europe2,
        Stack::Canada,
        Stack::Anz,
        Stack::UnitedKingdom,
    ];

    /// The identifier accepted on the command line, e.g. `app2.eu`.
    pub fn name(self) -> &'static str {
        match self {
            Stack::App => "app",
            Stack::App2 => "app2",
            Stack::App3 => "app3",
            Stack::App4 => "app4",
            Stack::Gov => "app.gov",
            Stack::China => "app.cn",
            Stack::Singapore => "app.sg",
            Stack::Europe => "app.eu",
            Stack::Europe2 => "app2.eu",
            Stack::Canada => "app.ca",
            Stack::Anz => "app.anz",
            Stack::UnitedKingdom => "app.uk",
        }
    }

    pub fn console_host(self) -> String {
        match self {
            Stack::China => CHINA_CONSOLE_HOST.to_string(),
            other => format!("{}.{}", other.name(), GLOBAL_DOMAIN),
        }
    }

    /// API hostname: the console hostname with its first `app` replaced by
    /// `api`. The China stack lives on its own domain pair instead.
    pub fn api_host(self) -> String {
        match self {
            Stack::China => CHINA_API_HOST.to_string(),
            other => other.console_host().replacen("app", "api", 1),
        }
    }
}

impl std::fmt::Display for Stack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_host_substitutes_first_app() {
        assert_eq!(Stack::App.api_host(), "api.prismacloud.io");
        assert_eq!(Stack::App2.api_host(), "api2.prismacloud.io");
        assert_eq!(Stack::Europe2.api_host(), "api2.eu.prismacloud.io");
        assert_eq!(Stack::Gov.api_host(), "api.gov.prismacloud.io");
    }

    #[test]
    fn test_console_host_uses_global_domain() {
        assert_eq!(Stack::Anz.console_host(), "app.anz.prismacloud.io");
        assert_eq!(Stack::App4.console_host(), "app4.prismacloud.io");
    }

    #[test]
    fn test_china_uses_fixed_domains() {
        assert_eq!(Stack::China.console_host(), "app.prismacloud.cn");
        assert_eq!(Stack::China.api_host(), "api.prismacloud.cn");
    }

    #[test]
    fn test_every_non_china_stack_follows_substitution_rule() {
        for stack in Stack::ALL.iter().filter(|s| **s != Stack::China) {
            let console = stack.console_host();
            assert_eq!(stack.api_host(), console.replacen("app", "api", 1));
            assert!(stack.api_host().ends_with(".prismacloud.io"));
        }
    }

    #[test]
    fn test_names_round_trip_through_clap() {
        for stack in Stack::ALL {
            let parsed = Stack::from_str(stack.name(), false).unwrap();
            assert_eq!(parsed, stack);
        }
        assert_eq!(Stack::value_variants().len(), Stack::ALL.len());
        assert!(Stack::from_str("app.mars", false).is_err());
    }
}
