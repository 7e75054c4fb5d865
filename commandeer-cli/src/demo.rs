//! # Demo Components
//!
//! The sample application wired into the `commandeer` binary: a base
//! component with a health check, a user component that extends it, and a
//! value provider with no instance.

use anyhow::{Context, Result, anyhow};
use commandeer_core::{
  ArgConfig, CallArgs, CommandMetadata, CommandOption, Component, Container, MetadataStore, MethodSet, ParsedArgs,
};
use futures::FutureExt;
use tracing::info;

use crate::output::{format_command, print_info, print_success, print_warning};

/// Health checks shared by every command component
#[derive(Debug, Default)]
pub struct HealthCommands;

impl HealthCommands {
  #[allow(clippy::print_stdout)]
  async fn ping(&self, _args: CallArgs) -> Result<()> {
    println!("pong");
    Ok(())
  }
}

impl Component for HealthCommands {
  fn methods(methods: &mut MethodSet<Self>) {
    methods.method("ping", |this, args| this.ping(args).boxed());
  }

  fn annotate(store: &mut MetadataStore) {
    store.command::<HealthCommands>(
      "ping",
      CommandMetadata::new(CommandOption::new("ping").describe("Check that the CLI responds")),
    );
  }
}

/// User management commands
#[derive(Debug, Default)]
pub struct UserCommands {
  health: HealthCommands,
}

impl UserCommands {
  async fn create(&self, args: CallArgs) -> Result<()> {
    let username: String = args.get(0).context("Invalid username")?;
    let group: String = args.get(1).context("Invalid group")?;
    let admin: bool = args.get::<Option<bool>>(2)?.unwrap_or(false);

    info!("Creating user {} in group {}", username, group);
    if admin {
      print_warning(&format!("Granting admin rights to {username}"));
    }
    let role = if admin { "admin" } else { "member" };
    print_success(&format!("Created user {username} in group {group} as {role}"));
    Ok(())
  }

  #[allow(clippy::print_stdout)]
  async fn echo(&self, args: CallArgs) -> Result<()> {
    let words: Vec<String> = args.get(0)?;
    let upper = args.get::<Option<bool>>(1)?.unwrap_or(false);
    let times = args.get::<Option<u32>>(2)?.unwrap_or(1);

    let line = words.join(" ");
    let line = if upper { line.to_uppercase() } else { line };
    for _ in 0..times {
      println!("{line}");
    }
    Ok(())
  }

  #[allow(clippy::print_stdout)]
  async fn inspect(&self, args: CallArgs) -> Result<()> {
    let argv: &ParsedArgs = args.argv(0).context("Parsed arguments were not provided")?;
    let pretty = args.get::<Option<bool>>(1)?.unwrap_or(false);

    let rendered = if pretty {
      serde_json::to_string_pretty(argv)?
    } else {
      serde_json::to_string(argv)?
    };
    print_info(&format!("Arguments for {}", format_command(&argv.commands.join(" "))));
    println!("{rendered}");
    Ok(())
  }

  async fn fail(&self, args: CallArgs) -> Result<()> {
    let message: Option<String> = args.get(0)?;
    Err(anyhow!(message.unwrap_or_else(|| "requested failure".to_string())))
  }
}

impl Component for UserCommands {
  fn methods(methods: &mut MethodSet<Self>) {
    methods
      .method("create", |this, args| this.create(args).boxed())
      .method("echo", |this, args| this.echo(args).boxed())
      .method("inspect", |this, args| this.inspect(args).boxed())
      .method("fail", |this, args| this.fail(args).boxed())
      .extend::<HealthCommands>(|this| &this.health);
  }

  fn annotate(store: &mut MetadataStore) {
    store.register::<HealthCommands>();
    store
      .command::<UserCommands>(
        "create",
        CommandMetadata::new(
          CommandOption::new("create:user <username>")
            .describe("Create a user")
            .alias("adduser"),
        )
        .positional(0, ArgConfig::new("username").describe("Login name of the new user"))
        .option(
          1,
          ArgConfig::new("group")
            .short('g')
            .describe("Group the user joins")
            .default_value("users"),
        )
        .option(2, ArgConfig::new("admin").boolean().describe("Grant admin rights")),
      )
      .command::<UserCommands>(
        "echo",
        CommandMetadata::new(CommandOption::new("echo <words..>").describe("Print the given words"))
          .positional(0, ArgConfig::new("words").array())
          .option(1, ArgConfig::new("upper").short('u').boolean().describe("Print in upper case"))
          .option(2, ArgConfig::new("times").number().describe("Repeat the line").default_value(1)),
      )
      .command::<UserCommands>(
        "inspect",
        CommandMetadata::new(CommandOption::new("inspect").describe("Print the parsed arguments as JSON"))
          .argv(0)
          .option(1, ArgConfig::new("pretty").boolean().describe("Pretty-print the JSON")),
      )
      .command::<UserCommands>(
        "fail",
        CommandMetadata::new(CommandOption::new("fail").describe("Exit with an error"))
          .option(0, ArgConfig::new("message").short('m').describe("Error message to report")),
      );
  }
}

/// The container the demo binary discovers commands from
pub fn container() -> Container {
  Container::new()
    .module("health", |module| {
      module.value("DATABASE_URL");
    })
    .module("users", |module| {
      module.provide(UserCommands::default());
    })
}

/// Metadata for every demo component
pub fn metadata() -> MetadataStore {
  let mut store = MetadataStore::new();
  store.register::<UserCommands>();
  store
}

#[cfg(test)]
mod tests {
  use commandeer_core::{ParamKind, explore};
  use commandeer_test_utils::RecordingSchema;
  use insta::assert_snapshot;

  use super::*;

  #[test]
  fn test_demo_discovers_every_command() {
    let commands = explore(&container(), &metadata());

    let names: Vec<&str> = commands.iter().map(|command| command.name()).collect();
    assert_eq!(names, vec!["create:user", "echo", "inspect", "fail", "ping"]);
  }

  #[test]
  fn test_create_user_schema() {
    let commands = explore(&container(), &metadata());
    let mut schema = RecordingSchema::new();

    commands[0].build(&mut schema);

    assert_snapshot!(schema.listing(), @r"
    positional username (string)
    option group (string)
    option admin (boolean)
    ");
  }

  #[test]
  fn test_inspect_binds_argv() {
    let commands = explore(&container(), &metadata());

    let inspect = &commands[2];
    assert_eq!(inspect.params().get(ParamKind::Argv).len(), 1);
    assert_eq!(inspect.params().get(ParamKind::Argv)[0].index, 0);
  }

  #[tokio::test]
  async fn test_fail_reports_message() {
    let commands = explore(&container(), &metadata());
    let argv = ParsedArgs::new("commandeer").command("fail").with("message", "boom");

    let err = commands[3].handle(argv).await.unwrap_err();

    assert_eq!(err.to_string(), "boom");
  }
}
