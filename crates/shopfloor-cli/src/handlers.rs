//! Command handlers bridging parsed CLI arguments to the engine.
//!
//! Each handler converts its argument wrapper into core parameters,
//! calls the engine, and prints the result through the core Display
//! types. Errors bubble up as anyhow for uniform reporting in main.

use anyhow::{bail, Context, Result};
use log::info;
use shopfloor_core::{
    params::{Id, Transition},
    Engine,
};

use crate::cli::{
    DeletePlanArgs, IdArg, NoteArgs, PlanCommands, StageCommands, TaskCommands, TemplateCommands,
};

pub struct Handler {
    engine: Engine,
    actor: String,
}

impl Handler {
    pub fn new(engine: Engine, actor: String) -> Self {
        Self { engine, actor }
    }

    fn transition(&self, id: u64, note: Option<String>) -> Transition {
        Transition {
            id,
            actor: self.actor.clone(),
            note,
        }
    }

    pub async fn handle_template_command(&self, command: TemplateCommands) -> Result<()> {
        match command {
            TemplateCommands::Create(args) => {
                let template = self
                    .engine
                    .create_template(&args.into())
                    .await
                    .context("Failed to create template")?;
                info!("Created template {}", template.id);
                print!("{template}");
            }
            TemplateCommands::AddStep(args) => {
                let step = self
                    .engine
                    .add_template_step(&args.into())
                    .await
                    .context("Failed to add template step")?;
                print!("{step}");
            }
            TemplateCommands::Show(args) => {
                let id = args.id;
                match self.engine.get_template(&args.into()).await? {
                    Some(template) => print!("{template}"),
                    None => bail!("Template {id} not found"),
                }
            }
            TemplateCommands::List(args) => {
                let templates = self.engine.list_templates(&args.into()).await?;
                println!("# Templates");
                println!();
                print!("{templates}");
            }
            TemplateCommands::Deactivate(args) => {
                let id = args.id;
                self.engine
                    .deactivate_template(&args.into())
                    .await
                    .context("Failed to deactivate template")?;
                println!("Deactivated template {id}");
            }
            TemplateCommands::Delete(args) => {
                let id = args.id;
                self.engine
                    .delete_template(&args.into())
                    .await
                    .context("Failed to delete template")?;
                println!("Deleted template {id}");
            }
        }
        Ok(())
    }

    pub async fn handle_plan_command(&self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::Create(args) => {
                let plan = self
                    .engine
                    .create_plan_from_template(&args.into())
                    .await
                    .context("Failed to create plan")?;
                info!("Created plan {}", plan.id);
                print!("{plan}");
            }
            PlanCommands::Copy(args) => {
                let plan = self
                    .engine
                    .copy_template_to_plan(&args.into())
                    .await
                    .context("Failed to apply template")?;
                print!("{plan}");
            }
            PlanCommands::List(args) => {
                let title = if args.archived {
                    "# All Plans"
                } else {
                    "# Active Plans"
                };
                let summaries = self.engine.list_plans_summary(&args.into()).await?;
                println!("{title}");
                println!();
                print!("{summaries}");
            }
            PlanCommands::Show(args) => {
                let id = args.id;
                match self.engine.get_plan(&args.into()).await? {
                    Some(plan) => print!("{plan}"),
                    None => bail!("Plan {id} not found"),
                }
            }
            PlanCommands::Archive(args) => {
                let id = args.id;
                self.engine
                    .archive_plan(&args.into())
                    .await
                    .context("Failed to archive plan")?;
                println!("Archived plan {id}");
            }
            PlanCommands::Unarchive(args) => {
                let id = args.id;
                self.engine
                    .unarchive_plan(&args.into())
                    .await
                    .context("Failed to unarchive plan")?;
                println!("Unarchived plan {id}");
            }
            PlanCommands::Delete(DeletePlanArgs { id, confirm }) => {
                if !confirm {
                    bail!("Deletion is permanent; pass --confirm to proceed");
                }
                match self.engine.delete_plan(&Id { id }).await? {
                    Some(plan) => {
                        println!("Deleted plan {} ({})", plan.id, plan.title);
                    }
                    None => bail!("Plan {id} not found"),
                }
            }
        }
        Ok(())
    }

    pub async fn handle_stage_command(&self, command: StageCommands) -> Result<()> {
        match command {
            StageCommands::Show(args) => {
                let id = args.id;
                match self.engine.get_stage(&args.into()).await? {
                    Some(stage) => print!("{stage}"),
                    None => bail!("Stage {id} not found"),
                }
            }
            StageCommands::Move(args) => {
                let queue = self
                    .engine
                    .move_stage(&args.into())
                    .await
                    .context("Failed to move stage")?;
                println!("# Queue");
                println!();
                print!("{queue}");
            }
            StageCommands::Assign(args) => {
                let stage = self
                    .engine
                    .assign_stage(&args.into())
                    .await
                    .context("Failed to assign stage")?;
                print!("{stage}");
            }
            StageCommands::Start(IdArg { id }) => {
                let stage = self
                    .engine
                    .start_stage(&self.transition(id, None))
                    .await
                    .context("Failed to start stage")?;
                print!("{stage}");
            }
            StageCommands::Pause(IdArg { id }) => {
                let stage = self
                    .engine
                    .pause_stage(&self.transition(id, None))
                    .await
                    .context("Failed to pause stage")?;
                print!("{stage}");
            }
            StageCommands::Complete(IdArg { id }) => {
                let stage = self
                    .engine
                    .complete_stage(&self.transition(id, None))
                    .await
                    .context("Failed to complete stage")?;
                print!("{stage}");
            }
            StageCommands::Problem(NoteArgs { id, note }) => {
                let stage = self
                    .engine
                    .flag_stage_problem(&self.transition(id, note))
                    .await
                    .context("Failed to flag problem")?;
                print!("{stage}");
            }
            StageCommands::Cancel(NoteArgs { id, note }) => {
                let stage = self
                    .engine
                    .cancel_stage(&self.transition(id, note))
                    .await
                    .context("Failed to cancel stage")?;
                print!("{stage}");
            }
            StageCommands::History(args) => {
                let history = self.engine.stage_history(&args.into()).await?;
                print!("{history}");
            }
        }
        Ok(())
    }

    pub async fn handle_task_command(&self, command: TaskCommands) -> Result<()> {
        match command {
            TaskCommands::Add(args) => {
                let task = self
                    .engine
                    .add_task(&args.into())
                    .await
                    .context("Failed to add task")?;
                print!("{task}");
            }
            TaskCommands::List(args) => {
                let tasks = self.engine.get_tasks(&args.into()).await?;
                print!("{tasks}");
            }
            TaskCommands::Assign(args) => {
                let task = self
                    .engine
                    .assign_task(&args.into())
                    .await
                    .context("Failed to assign task")?;
                print!("{task}");
            }
            TaskCommands::Start(IdArg { id }) => {
                let task = self
                    .engine
                    .start_task(&self.transition(id, None))
                    .await
                    .context("Failed to start task")?;
                print!("{task}");
            }
            TaskCommands::Pause(IdArg { id }) => {
                let task = self
                    .engine
                    .pause_task(&self.transition(id, None))
                    .await
                    .context("Failed to pause task")?;
                print!("{task}");
            }
            TaskCommands::Complete(IdArg { id }) => {
                let task = self
                    .engine
                    .complete_task(&self.transition(id, None))
                    .await
                    .context("Failed to complete task")?;
                print!("{task}");
            }
            TaskCommands::Problem(NoteArgs { id, note }) => {
                let task = self
                    .engine
                    .flag_task_problem(&self.transition(id, note))
                    .await
                    .context("Failed to flag problem")?;
                print!("{task}");
            }
            TaskCommands::Cancel(NoteArgs { id, note }) => {
                let task = self
                    .engine
                    .cancel_task(&self.transition(id, note))
                    .await
                    .context("Failed to cancel task")?;
                print!("{task}");
            }
            TaskCommands::History(args) => {
                let history = self.engine.task_history(&args.into()).await?;
                print!("{history}");
            }
        }
        Ok(())
    }
}
