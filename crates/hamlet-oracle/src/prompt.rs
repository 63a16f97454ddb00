//! Prompt template loading and rendering via `minijinja`.
//!
//! Three templates make up every prompt: `system.j2` (who the agent is
//! and the movement rules) plus either `step.j2` or `daily.j2`. Built-in
//! copies are compiled into the binary; a templates directory can replace
//! them so prompts can be tuned without recompiling.

use minijinja::Environment;
use serde::Serialize;

use hamlet_types::{DailyContext, StepContext};

use crate::error::OracleClientError;

const BUILTIN_SYSTEM: &str = include_str!("../templates/system.j2");
const BUILTIN_STEP: &str = include_str!("../templates/step.j2");
const BUILTIN_DAILY: &str = include_str!("../templates/daily.j2");

/// Template names and the files they are read from.
const TEMPLATES: [(&str, &str); 3] = [
    ("system", "system.j2"),
    ("step", "step.j2"),
    ("daily", "daily.j2"),
];

/// Manages prompt template loading and rendering.
pub struct PromptEngine {
    env: Environment<'static>,
}

/// The complete rendered prompt ready to send to an LLM backend.
#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    /// System message establishing the agent and the rules.
    pub system: String,
    /// User message with the situation and the requested JSON shape.
    pub user: String,
}

impl PromptEngine {
    /// Create a prompt engine from `templates_dir`, or from the built-in
    /// templates when it is empty.
    ///
    /// The directory must contain `system.j2`, `step.j2`, and `daily.j2`.
    ///
    /// # Errors
    ///
    /// Returns [`OracleClientError::Template`] if a file is missing or a
    /// template does not compile.
    pub fn new(templates_dir: &str) -> Result<Self, OracleClientError> {
        if templates_dir.trim().is_empty() {
            return Self::builtin();
        }
        let mut env = Environment::new();
        for (name, file) in TEMPLATES {
            let source = load_template(templates_dir, file)?;
            env.add_template_owned(name, source).map_err(|e| {
                OracleClientError::Template(format!("failed to add {name} template: {e}"))
            })?;
        }
        Ok(Self { env })
    }

    /// Create a prompt engine from the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns [`OracleClientError::Template`] if a built-in template does
    /// not compile.
    pub fn builtin() -> Result<Self, OracleClientError> {
        let mut env = Environment::new();
        for (name, source) in [
            ("system", BUILTIN_SYSTEM),
            ("step", BUILTIN_STEP),
            ("daily", BUILTIN_DAILY),
        ] {
            env.add_template(name, source).map_err(|e| {
                OracleClientError::Template(format!("failed to add {name} template: {e}"))
            })?;
        }
        Ok(Self { env })
    }

    /// Render the prompt for a one-step plan.
    ///
    /// # Errors
    ///
    /// Returns [`OracleClientError::Template`] if rendering fails.
    pub fn render_step(&self, ctx: &StepContext) -> Result<RenderedPrompt, OracleClientError> {
        Ok(RenderedPrompt {
            system: self.render("system", ctx)?,
            user: self.render("step", ctx)?,
        })
    }

    /// Render the prompt for a daily plan.
    ///
    /// # Errors
    ///
    /// Returns [`OracleClientError::Template`] if rendering fails.
    pub fn render_daily(&self, ctx: &DailyContext) -> Result<RenderedPrompt, OracleClientError> {
        Ok(RenderedPrompt {
            system: self.render("system", ctx)?,
            user: self.render("daily", ctx)?,
        })
    }

    fn render<S: Serialize>(&self, name: &str, ctx: &S) -> Result<String, OracleClientError> {
        self.env
            .get_template(name)
            .map_err(|e| OracleClientError::Template(format!("missing {name} template: {e}")))?
            .render(ctx)
            .map_err(|e| OracleClientError::Template(format!("{name} render failed: {e}")))
    }
}

/// Read a template file from disk.
fn load_template(dir: &str, filename: &str) -> Result<String, OracleClientError> {
    let path = format!("{dir}/{filename}");
    std::fs::read_to_string(&path)
        .map_err(|e| OracleClientError::Template(format!("failed to read {path}: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hamlet_types::{
        AgentProfile, Position, TileKind, VisibleAgent, VisibleEntities, VisibleTile,
    };

    use super::*;

    fn profile() -> AgentProfile {
        AgentProfile {
            name: "Gus".to_owned(),
            role: "Fisherman".to_owned(),
            age: 32,
            personality: "Shy".to_owned(),
            position: Position::new(8, 2),
            vision_radius: 5,
        }
    }

    fn step_context(directives: Vec<String>) -> StepContext {
        StepContext {
            time: "06:10".to_owned(),
            agent: profile(),
            vision: VisibleEntities {
                tiles: vec![VisibleTile {
                    position: Position::new(9, 4),
                    kind: TileKind::Path,
                }],
                agents: vec![VisibleAgent {
                    name: "Ada".to_owned(),
                    position: Position::new(6, 2),
                    speech: "Lovely morning.".to_owned(),
                }],
            },
            prev_action_plan: String::new(),
            daily_plan: "Fish by the bridge.".to_owned(),
            directives,
        }
    }

    #[test]
    fn builtin_step_prompt_carries_context() {
        let engine = PromptEngine::builtin().unwrap();
        let prompt = engine
            .render_step(&step_context(vec!["Gather at the store.".to_owned()]))
            .unwrap();

        assert!(prompt.system.contains("Gus"));
        assert!(prompt.system.contains("Fisherman"));
        assert!(prompt.user.contains("06:10"));
        assert!(prompt.user.contains("(8, 2)"));
        assert!(prompt.user.contains("path at (9, 4)"));
        assert!(prompt.user.contains("Ada at (6, 2)"));
        assert!(prompt.user.contains("Lovely morning."));
        assert!(prompt.user.contains("Fish by the bridge."));
        assert!(prompt.user.contains("Gather at the store."));
        assert!(prompt.user.contains("\"direction\""));
    }

    #[test]
    fn directives_section_is_omitted_when_empty() {
        let engine = PromptEngine::builtin().unwrap();
        let prompt = engine.render_step(&step_context(Vec::new())).unwrap();
        assert!(!prompt.user.contains("operator"));
    }

    #[test]
    fn builtin_daily_prompt_carries_context() {
        let engine = PromptEngine::builtin().unwrap();
        let prompt = engine
            .render_daily(&DailyContext {
                date: "2024-05-01".to_owned(),
                layout_summary: "Grid of size 48x27 covered in grass.".to_owned(),
                agent: profile(),
                previous_daily_plan: "Mend nets.".to_owned(),
            })
            .unwrap();
        assert!(prompt.user.contains("2024-05-01"));
        assert!(prompt.user.contains("48x27"));
        assert!(prompt.user.contains("Mend nets."));
        assert!(prompt.user.contains("\"daily_plan\""));
    }

    #[test]
    fn templates_load_from_directory() {
        let unique = format!(
            "hamlet_test_templates_{}_{:?}",
            std::process::id(),
            std::thread::current().id(),
        );
        let dir = std::env::temp_dir().join(unique);
        std::fs::create_dir_all(&dir).ok();
        std::fs::write(dir.join("system.j2"), "You are {{ agent.name }}.").ok();
        std::fs::write(dir.join("step.j2"), "Time {{ time }}").ok();
        std::fs::write(dir.join("daily.j2"), "Date {{ date }}").ok();

        let engine = PromptEngine::new(dir.to_str().unwrap_or("")).unwrap();
        let prompt = engine.render_step(&step_context(Vec::new())).unwrap();
        assert_eq!(prompt.system, "You are Gus.");
        assert_eq!(prompt.user, "Time 06:10");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_template_returns_error() {
        let unique = format!(
            "hamlet_missing_templates_{}_{:?}",
            std::process::id(),
            std::thread::current().id(),
        );
        let dir = std::env::temp_dir().join(unique);
        std::fs::create_dir_all(&dir).ok();
        std::fs::write(dir.join("system.j2"), "test").ok();

        let result = PromptEngine::new(dir.to_str().unwrap_or(""));
        assert!(matches!(result, Err(OracleClientError::Template(_))));

        std::fs::remove_dir_all(&dir).ok();
    }
}
