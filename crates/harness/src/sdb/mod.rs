//! Simple debugger.
//!
//! This module implements the operator-facing command loop. It provides:
//! 1. **Command dispatch:** A table over a closed set of command variants,
//!    case-insensitive on the first token, with the remainder of the line
//!    passed to the handler as raw argument text.
//! 2. **Inspection:** Register/watchpoint listing, expression printing, and
//!    memory examination — all through read-only views.
//! 3. **Control:** Unbounded continue, bounded stepping, watchpoint
//!    allocation and deletion, and quit.
//!
//! In batch mode the loop issues exactly one unbounded continue and returns
//! without reading any commands. User-input errors are reported on the
//! output stream and never change machine state.

/// Expression evaluator over read-only machine state.
pub mod expr;

/// Fixed-capacity watchpoint pool.
pub mod watchpoint;

use std::io::{self, BufRead, Write};

use crate::arch::reg;
use crate::common::error::SimError;
use crate::common::status::SimStatus;
use crate::sdb::expr::MachineView;
use crate::sim::executor::Executor;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CmdKind {
    Help,
    Continue,
    Quit,
    Step,
    Info,
    Print,
    Examine,
    Watch,
    Delete,
}

struct CmdSpec {
    name: &'static str,
    alias: Option<&'static str>,
    kind: CmdKind,
    description: &'static str,
}

/// The closed command table. Dispatch matches the lowercased first token
/// against `name` or `alias`.
const COMMANDS: &[CmdSpec] = &[
    CmdSpec {
        name: "help",
        alias: None,
        kind: CmdKind::Help,
        description: "Display information about all supported commands",
    },
    CmdSpec {
        name: "continue",
        alias: Some("c"),
        kind: CmdKind::Continue,
        description: "Continue the execution of the program",
    },
    CmdSpec {
        name: "quit",
        alias: Some("q"),
        kind: CmdKind::Quit,
        description: "Exit the debugger",
    },
    CmdSpec {
        name: "step",
        alias: Some("si"),
        kind: CmdKind::Step,
        description: "Execute N instructions, then stop (N defaults to 1)",
    },
    CmdSpec {
        name: "info",
        alias: None,
        kind: CmdKind::Info,
        description: "Print registers (info r) or watchpoints (info w)",
    },
    CmdSpec {
        name: "print",
        alias: Some("p"),
        kind: CmdKind::Print,
        description: "Evaluate an expression against the current machine state",
    },
    CmdSpec {
        name: "examine",
        alias: Some("x"),
        kind: CmdKind::Examine,
        description: "Print N consecutive words starting at an address: examine N EXPR",
    },
    CmdSpec {
        name: "watch",
        alias: Some("w"),
        kind: CmdKind::Watch,
        description: "Stop execution whenever the value of an expression changes",
    },
    CmdSpec {
        name: "delete",
        alias: Some("d"),
        kind: CmdKind::Delete,
        description: "Delete the watchpoint with the given id",
    },
];

fn lookup(token: &str) -> Option<&'static CmdSpec> {
    COMMANDS
        .iter()
        .find(|spec| spec.name == token || spec.alias == Some(token))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LoopControl {
    KeepReading,
    Quit,
}

/// Interactive debugger driving an [`Executor`].
#[derive(Debug)]
pub struct Debugger {
    exec: Executor,
}

impl Debugger {
    /// Wraps an executor in the command loop.
    pub fn new(exec: Executor) -> Self {
        Self { exec }
    }

    /// The wrapped executor.
    pub fn executor(&self) -> &Executor {
        &self.exec
    }

    /// Mutable access to the wrapped executor.
    pub fn executor_mut(&mut self) -> &mut Executor {
        &mut self.exec
    }

    /// Runs the command loop over newline-delimited commands from `input`.
    ///
    /// In batch mode one unconditional continue is issued and the loop
    /// returns without reading from `input` at all.
    pub fn run<R: BufRead>(&mut self, mut input: R, batch: bool) {
        if batch {
            self.resume(None);
            return;
        }
        let mut line = String::new();
        loop {
            print!("(lockstep) ");
            let _ = io::stdout().flush();
            line.clear();
            match input.read_line(&mut line) {
                Ok(0) => return,
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read command");
                    return;
                }
            }
            if self.dispatch(&line) == LoopControl::Quit {
                return;
            }
        }
    }

    /// Parses and executes one command line.
    fn dispatch(&mut self, line: &str) -> LoopControl {
        let trimmed = line.trim();
        let Some(token) = trimmed.split_whitespace().next() else {
            return LoopControl::KeepReading;
        };
        let args = trimmed[token.len()..].trim();
        let lowered = token.to_ascii_lowercase();
        let Some(spec) = lookup(&lowered) else {
            println!("Unknown command '{token}'");
            return LoopControl::KeepReading;
        };
        match spec.kind {
            CmdKind::Help => self.cmd_help(args),
            CmdKind::Continue => self.resume(None),
            CmdKind::Quit => return LoopControl::Quit,
            CmdKind::Step => self.cmd_step(args),
            CmdKind::Info => self.cmd_info(args),
            CmdKind::Print => self.cmd_print(args),
            CmdKind::Examine => self.cmd_examine(args),
            CmdKind::Watch => self.cmd_watch(args),
            CmdKind::Delete => self.cmd_delete(args),
        }
        LoopControl::KeepReading
    }

    fn resume(&mut self, limit: Option<u64>) {
        match self.exec.run(limit) {
            Ok(SimStatus::Ended { code }) => {
                println!("Program ended with exit code {code}");
            }
            Ok(_) => {}
            Err(e) => {
                // Structural failure: the run is aborted, but the operator
                // keeps the loop for post-mortem inspection.
                eprintln!("lockstep: fatal: {e}");
                if matches!(e, SimError::Divergence(_)) {
                    eprintln!("lockstep: difftest divergence, aborting the run");
                }
            }
        }
    }

    fn cmd_step(&mut self, args: &str) {
        let count = if args.is_empty() {
            1
        } else {
            match args.parse::<i64>() {
                Ok(n) if n > 0 => n,
                _ => {
                    println!("N must be a positive integer");
                    return;
                }
            }
        };
        self.resume(Some(count as u64));
    }

    fn cmd_info(&mut self, args: &str) {
        match args {
            "r" => {
                let ctx = self.exec.context();
                for (i, value) in ctx.gprs.iter().enumerate() {
                    println!("{:<4} {:#010x}  {}", reg::name(i), value, value);
                }
                println!("{:<4} {:#010x}  {}", "pc", ctx.pc, ctx.pc);
            }
            "w" => {
                for wp in self.exec.pool().iter() {
                    println!(
                        "{:<3} {:<24} last value: {:#010x}",
                        wp.id, wp.expr, wp.last_value
                    );
                }
            }
            _ => println!("Need argument: r (registers) or w (watchpoints)"),
        }
    }

    fn cmd_print(&mut self, args: &str) {
        if args.is_empty() {
            println!("Format: print EXPR");
            return;
        }
        let view = self.exec.view();
        match expr::eval(args, &view) {
            Ok(value) => println!("{value} ({value:#010x})"),
            Err(e) => println!("expression not valid: {e}"),
        }
    }

    fn cmd_examine(&mut self, args: &str) {
        let Some(count_token) = args.split_whitespace().next() else {
            println!("Format: examine N EXPR");
            return;
        };
        let Ok(count) = count_token.parse::<i64>() else {
            println!("N must be a positive integer");
            return;
        };
        if count <= 0 {
            println!("N must be a positive integer");
            return;
        }
        let expr_text = args[count_token.len()..].trim();
        if expr_text.is_empty() {
            println!("Need an address expression");
            return;
        }
        let view = self.exec.view();
        let base = match expr::eval(expr_text, &view) {
            Ok(addr) => addr,
            Err(e) => {
                println!("expression not valid: {e}");
                return;
            }
        };
        for i in 0..count as u32 {
            let addr = base.wrapping_add(4 * i);
            match view.read_word(addr) {
                Some(word) => println!("{addr:#010x}: {word:#010x}"),
                None => {
                    println!("cannot access memory at {addr:#010x}");
                    break;
                }
            }
        }
    }

    fn cmd_watch(&mut self, args: &str) {
        if args.is_empty() {
            println!("Format: watch EXPR");
            return;
        }
        // Evaluate before touching the pool: a failed evaluation must not
        // move any slot between the lists.
        let initial = {
            let view = self.exec.view();
            match expr::eval(args, &view) {
                Ok(value) => value,
                Err(e) => {
                    println!("expression not valid: {e}");
                    return;
                }
            }
        };
        match self.exec.pool_mut().add(args.to_string(), initial) {
            Ok(id) => println!("Watchpoint {id}: {args} = {initial:#010x}"),
            Err(e) => println!("{e}"),
        }
    }

    fn cmd_delete(&mut self, args: &str) {
        let Ok(id) = args.parse::<usize>() else {
            println!("Format: delete ID");
            return;
        };
        if self.exec.pool_mut().remove(id) {
            println!("Deleted watchpoint {id}");
        } else {
            println!("No watchpoint {id}");
        }
    }

    fn cmd_help(&mut self, args: &str) {
        if args.is_empty() {
            for spec in COMMANDS {
                match spec.alias {
                    Some(alias) => {
                        println!("{} ({}) - {}", spec.name, alias, spec.description);
                    }
                    None => println!("{} - {}", spec.name, spec.description),
                }
            }
            return;
        }
        let lowered = args.to_ascii_lowercase();
        match lookup(&lowered) {
            Some(spec) => println!("{} - {}", spec.name, spec.description),
            None => println!("Unknown command '{args}'"),
        }
    }
}
