//! Host runtime: owns the board and dispatches calls into the module tables

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use crate::badge_module::BADGE_MODULE;
use crate::console::{self, Expr};
use crate::error::BadgeError;
use crate::framebuffer::Framebuffer;
use crate::hal::Board;
use crate::os_module::{MountTable, UOS_MODULE};
use crate::table::{Module, Session};
use crate::ugfx::Ugfx;
use crate::value::Value;

/// Every module a script can import.
pub static MODULES: &[&Module] = &[&BADGE_MODULE, &UOS_MODULE];

pub fn find_module(name: &str) -> Result<&'static Module, BadgeError> {
    MODULES
        .iter()
        .copied()
        .find(|module| module.name == name)
        .ok_or_else(|| BadgeError::Attribute {
            module: String::from(name),
            name: String::new(),
        })
}

pub struct Runtime<B: Board> {
    board: B,
    gfx: Ugfx,
    mounts: MountTable,
}

impl<B: Board> Runtime<B> {
    pub fn new(board: B) -> Self {
        Self {
            board,
            gfx: Ugfx::new(),
            mounts: MountTable::new(),
        }
    }

    /// `module.name(*args)`
    pub fn call(&mut self, module: &str, name: &str, args: &[Value]) -> Result<Value, BadgeError> {
        let module = find_module(module)?;
        let mut session = Session {
            board: &mut self.board,
            gfx: &mut self.gfx,
            mounts: &mut self.mounts,
        };
        module.call(&mut session, name, args)
    }

    /// `module.name` without a call.
    pub fn attr(&self, module: &str, name: &str) -> Result<Value, BadgeError> {
        find_module(module)?.attr(name)
    }

    pub fn eval(&mut self, expr: &Expr) -> Result<Value, BadgeError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Tuple(items) => Ok(Value::Tuple(self.eval_all(items)?)),
            Expr::List(items) => Ok(Value::List(self.eval_all(items)?)),
            Expr::Attr { module, name } => self.attr(module, name),
            Expr::Call { module, name, args } => {
                let args = self.eval_all(args)?;
                self.call(module, name, &args)
            }
        }
    }

    fn eval_all(&mut self, exprs: &[Expr]) -> Result<Vec<Value>, BadgeError> {
        exprs.iter().map(|expr| self.eval(expr)).collect()
    }

    /// Parse and evaluate one console line.
    pub fn run_line(&mut self, line: &str) -> Result<Value, BadgeError> {
        let expr = console::parse(line)?;
        self.eval(&expr)
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn gfx(&self) -> &Ugfx {
        &self.gfx
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        self.gfx.framebuffer()
    }

    pub fn mounts(&self) -> &MountTable {
        &self.mounts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Errno;
    use crate::mock::MockBoard;
    use alloc::string::ToString;

    #[test]
    fn console_line_drives_the_board() {
        let mut rt = Runtime::new(MockBoard::new());
        assert_eq!(rt.run_line("badge.init()"), Ok(Value::None));
        assert!(rt.board().panel.initialized);
        rt.run_line("badge.ugfx_init()").unwrap();
        rt.run_line("badge.area(0, 0, 10, 10, badge.BLACK)").unwrap();
        assert_eq!(rt.framebuffer().black_pixels(), 100);
    }

    #[test]
    fn unknown_module_reads_as_import_error() {
        let mut rt = Runtime::new(MockBoard::new());
        let err = rt.run_line("network.connect()").unwrap_err();
        assert_eq!(err.to_string(), "ImportError: no module named 'network'");
    }

    #[test]
    fn results_echo_in_repr_style() {
        let mut rt = Runtime::new(MockBoard::new());
        rt.board_mut().entropy.push_words(&[0x0000_4142]);
        assert_eq!(rt.run_line("uos.urandom(3)").unwrap().to_string(), "b'BA\\x00'");
        assert_eq!(rt.run_line("badge.WHITE").unwrap().to_string(), "1");
        assert_eq!(rt.run_line("uos.__name__").unwrap().to_string(), "'uos'");
    }

    #[test]
    fn mount_state_persists_between_calls() {
        let mut rt = Runtime::new(MockBoard::new());
        rt.run_line("uos.mount('locfd', '/bpi')").unwrap();
        assert!(rt.mounts().is_mounted("/bpi"));
        assert_eq!(
            rt.run_line("uos.mount('locfd', '/bpi')"),
            Err(BadgeError::Os(Errno::Einval))
        );
        assert!(rt.mounts().is_mounted("/bpi"));
        rt.run_line("uos.umount('/bpi')").unwrap();
        assert!(!rt.mounts().is_mounted("/bpi"));
    }
}
