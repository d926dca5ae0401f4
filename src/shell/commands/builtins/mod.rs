pub mod fs;
pub mod env;
pub mod io;
pub mod common; // Private helpers

use std::sync::Arc;

use crate::shell::commands::registry::CommandRegistry;

/// Helper to register all built-in commands at once
pub fn register_all_builtins(registry: &mut CommandRegistry) {
    // FS commands
    registry.register("ls", Arc::new(fs::ls::LsCommand));
    registry.register("mkdir", Arc::new(fs::mkdir::MkdirCommand));
    registry.register("touch", Arc::new(fs::touch::TouchCommand));
    registry.register("rm", Arc::new(fs::rm::RmCommand));
    registry.register("cp", Arc::new(fs::cp::CpCommand));
    registry.register("mv", Arc::new(fs::mv::MvCommand));
    registry.register("stat", Arc::new(fs::stat::StatCommand));
    registry.register("projects", Arc::new(fs::projects::ProjectsCommand));

    // Env/Navigation
    registry.register("cd", Arc::new(env::cd::CdCommand));
    registry.register("pwd", Arc::new(env::pwd::PwdCommand));
    registry.register("whoami", Arc::new(env::whoami::WhoamiCommand));
    registry.register("help", Arc::new(env::help::HelpCommand));
    registry.register("ps", Arc::new(env::ps::PsCommand));

    // IO
    registry.register("echo", Arc::new(io::echo::EchoCommand));
    registry.register("cat", Arc::new(io::cat::CatCommand));
    registry.register("wc", Arc::new(io::wc::WcCommand));
    registry.register("head", Arc::new(io::head::HeadCommand));
    registry.register("tail", Arc::new(io::head::TailCommand));
    registry.register("grep", Arc::new(io::grep::GrepCommand));
    registry.register("clear", Arc::new(io::clear::ClearCommand));
}
