#![forbid(unsafe_code)]

//! Command bindings: route an executor's requests to a command and mirror
//! the command's can-execute state back onto the executor.

use std::rc::Rc;

use ftui_notify::{Command, CommandExecutor, ObjectId};

use crate::error::{BindResult, BindingKind};
use crate::key::ContextId;
use crate::registry::BindingRegistry;
use crate::table::{Record, anchor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct CommandKey {
    pub(crate) context: ContextId,
    pub(crate) executor: ObjectId,
}

impl BindingRegistry {
    /// Bind `executor` to `command`, passing `Default::default()` as the
    /// parameter.
    ///
    /// # Errors
    ///
    /// [`BindError::Conflict`](crate::BindError::Conflict) if `executor`
    /// already has a command under `context`.
    pub fn bind_command<E, C>(
        &self,
        context: ContextId,
        executor: &Rc<E>,
        command: &Rc<C>,
    ) -> BindResult<()>
    where
        E: CommandExecutor + 'static,
        C: Command + 'static,
        C::Parameter: Default,
    {
        self.bind_command_with(
            context,
            executor,
            command,
            <C::Parameter as Default>::default,
        )
    }

    /// Bind `executor` to `command`. `parameter` is evaluated each time the
    /// command is executed or its can-execute state is queried.
    ///
    /// The executor's enabled state is set immediately and then follows
    /// every can-execute-changed notification of the command.
    ///
    /// # Errors
    ///
    /// Same as [`bind_command`](Self::bind_command).
    pub fn bind_command_with<E, C>(
        &self,
        context: ContextId,
        executor: &Rc<E>,
        command: &Rc<C>,
        parameter: impl Fn() -> C::Parameter + 'static,
    ) -> BindResult<()>
    where
        E: CommandExecutor + 'static,
        C: Command + 'static,
    {
        let key = CommandKey {
            context,
            executor: ObjectId::of(executor),
        };
        Self::ensure_vacant(&self.state.commands, &key, BindingKind::Command, context)?;

        let parameter: Rc<dyn Fn() -> C::Parameter> = Rc::new(parameter);

        let on_request = {
            let weak_command = Rc::downgrade(command);
            let parameter = Rc::clone(&parameter);
            executor.execute_requested().subscribe(move |()| {
                if let Some(command) = weak_command.upgrade() {
                    command.execute(&parameter());
                }
            })
        };
        let on_can_execute = {
            let weak_command = Rc::downgrade(command);
            let weak_executor = Rc::downgrade(executor);
            let parameter = Rc::clone(&parameter);
            command.can_execute_changed().subscribe(move |()| {
                if let (Some(command), Some(executor)) =
                    (weak_command.upgrade(), weak_executor.upgrade())
                {
                    executor.set_can_execute(command.can_execute(&parameter()));
                }
            })
        };

        Self::store(
            &self.state.commands,
            key,
            Record::new(
                ObjectId::of(command),
                vec![on_request, on_can_execute],
                vec![anchor(executor), anchor(command)],
            ),
            BindingKind::Command,
            context,
        )?;
        let enabled = command.can_execute(&parameter());
        executor.set_can_execute(enabled);
        tracing::debug!(
            context = %context,
            executor = %key.executor,
            command = %ObjectId::of(command),
            enabled,
            "bound command"
        );
        Ok(())
    }

    /// Remove the binding of `executor` to `command`.
    pub fn unbind_command<E, C>(
        &self,
        context: ContextId,
        executor: &Rc<E>,
        command: &Rc<C>,
    ) -> usize {
        let (executor, command) = (ObjectId::of(executor), ObjectId::of(command));
        self.unbind_commands_where(context, |k, c| k.executor == executor && c == command)
    }

    /// Remove whatever command `executor` is bound to.
    pub fn unbind_executor<E>(&self, context: ContextId, executor: &Rc<E>) -> usize {
        let executor = ObjectId::of(executor);
        self.unbind_commands_where(context, |k, _| k.executor == executor)
    }

    /// Remove every command binding under `context`.
    pub fn unbind_commands(&self, context: ContextId) -> usize {
        self.unbind_commands_where(context, |_, _| true)
    }

    fn unbind_commands_where(
        &self,
        context: ContextId,
        pred: impl Fn(&CommandKey, ObjectId) -> bool,
    ) -> usize {
        let removed = Self::drain(&self.state.commands, |k, r| {
            k.context == context && pred(k, r.meta)
        });
        tracing::debug!(context = %context, removed, "unbound commands");
        removed
    }
}
