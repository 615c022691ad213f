//! The `bandscore shell` command: the interactive admin view.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use bandscore_client::{AdminConfig, Layout};
use bandscore_core::model::RecordId;
use bandscore_core::{AdminController, SubmitOutcome};

use crate::render;
use crate::view::{self, LinePrompt, QueuedAlerts};

const HELP: &str = "\
Commands:
  search [term]          filter by name (no term clears the filter)
  add                    open the form for a new student
  edit <id>              open the form for an existing student
  set <field> <value>    fill a form field (name, listening, reading, ...)
  save                   validate and save the form
  cancel                 close the form without saving
  delete <id>            delete a student (asks first)
  refresh                reload the list from the backend
  show                   print the list again
  layout <auto|table|cards>
  help
  quit";

pub async fn execute(config_path: Option<PathBuf>, base_url: Option<String>) -> Result<()> {
    let config = view::load(config_path.as_deref(), base_url)?;
    let alerts = Arc::new(QueuedAlerts::default());
    let controller = view::open(&config, alerts.clone()).await?;

    let stdin = io::stdin();
    let mut shell = Shell::new(controller, &config, alerts, stdin.lock(), io::stdout());
    shell.run().await
}

/// Line-driven front end over one [`AdminController`].
pub struct Shell<R, W> {
    controller: AdminController,
    alerts: Arc<QueuedAlerts>,
    layout: Layout,
    breakpoint: usize,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// `controller` should report alerts to `alerts`.
    pub fn new(
        controller: AdminController,
        config: &AdminConfig,
        alerts: Arc<QueuedAlerts>,
        input: R,
        output: W,
    ) -> Self {
        Self {
            controller,
            alerts,
            layout: config.layout,
            breakpoint: config.card_breakpoint,
            input,
            output,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.print_list()?;
        writeln!(self.output, "Type `help` for commands.")?;

        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            if !self.handle(line.trim()).await? {
                break;
            }
        }
        Ok(())
    }

    /// Run one command line. Returns `false` to quit.
    async fn handle(&mut self, line: &str) -> Result<bool> {
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "quit" | "exit" => return Ok(false),
            "help" => writeln!(self.output, "{HELP}")?,
            "show" | "list" => self.print_list()?,
            "search" => {
                self.controller.set_search(rest);
                self.print_list()?;
            }
            "refresh" => {
                self.controller.refresh().await;
                self.print_list()?;
            }
            "layout" => match rest.parse::<Layout>() {
                Ok(layout) => {
                    self.layout = layout;
                    self.print_list()?;
                }
                Err(e) => writeln!(self.output, "{e}")?,
            },
            "add" => {
                self.controller.open_for_create();
                self.print_form()?;
            }
            "edit" => match rest.parse::<RecordId>() {
                Ok(id) => match self.controller.open_for_edit_by_id(&id) {
                    Ok(()) => self.print_form()?,
                    Err(e) => writeln!(self.output, "{e}")?,
                },
                Err(e) => writeln!(self.output, "{e}. Usage: edit <id>")?,
            },
            "set" => {
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                match self.controller.update_field(field, value.trim()) {
                    Ok(()) => self.print_form()?,
                    Err(e) => writeln!(self.output, "{e}")?,
                }
            }
            "cancel" => {
                self.controller.cancel();
                writeln!(self.output, "Form closed.")?;
            }
            "save" => self.save().await?,
            "delete" => match rest.parse::<RecordId>() {
                Ok(id) => {
                    let mut gate = LinePrompt {
                        input: &mut self.input,
                        output: &mut self.output,
                    };
                    self.controller.delete(&id, &mut gate).await;
                    self.print_list()?;
                }
                Err(e) => writeln!(self.output, "{e}. Usage: delete <id>")?,
            },
            other => writeln!(self.output, "Unknown command: {other}. Type `help`.")?,
        }
        Ok(true)
    }

    async fn save(&mut self) -> Result<()> {
        let outcome = self.controller.submit().await;
        for message in self.alerts.drain() {
            writeln!(self.output, "Warning: {message}")?;
        }
        match outcome {
            SubmitOutcome::Saved => {
                writeln!(self.output, "Saved.")?;
                self.print_list()?;
            }
            SubmitOutcome::NotOpen => {
                writeln!(self.output, "No form is open. Use `add` or `edit <id>`.")?;
            }
            SubmitOutcome::Busy => {}
            SubmitOutcome::Failed | SubmitOutcome::Rejected(_) => self.print_form()?,
        }
        Ok(())
    }

    fn print_list(&mut self) -> Result<()> {
        let layout = render::resolve_layout(self.layout, render::terminal_width(), self.breakpoint);
        let visible = self.controller.visible();
        let body = render::render_records(&visible, self.controller.schema(), layout);
        let footer = render::render_footer(
            visible.len(),
            self.controller.records().len(),
            self.controller.last_refreshed(),
        );
        if !self.controller.search().is_empty() {
            writeln!(self.output, "Search: {}", self.controller.search())?;
        }
        writeln!(self.output, "{body}\n{footer}")?;
        Ok(())
    }

    fn print_form(&mut self) -> Result<()> {
        match self.controller.form() {
            Some(form) => {
                let text = render::render_form(form, self.controller.is_saving());
                writeln!(self.output, "{text}")?;
            }
            None => writeln!(self.output, "Form closed.")?,
        }
        Ok(())
    }

    /// Consume the shell and hand back what it wrote.
    pub fn into_output(self) -> W {
        self.output
    }
}
