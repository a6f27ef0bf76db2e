//! Command Buffers
//!
//! Commands are recorded on the CPU and handed to the host with
//! [`RenderContext::execute_command_buffer`](crate::host::RenderContext::execute_command_buffer).
//! Nothing recorded here reaches the GPU until the host context is submitted.

use glam::{Mat4, Vec4};

use crate::resource::{LoadAction, Rect, ShaderProperty, StoreAction, TemporaryTargetDesc};

/// A recorded render command
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Open a named profiling scope
    BeginSample(String),

    /// Close a named profiling scope
    EndSample(String),

    /// Clear the active render target
    ClearRenderTarget {
        depth: bool,
        color: bool,
        clear_color: Vec4,
    },

    /// Allocate a temporary render target
    GetTemporaryTarget {
        id: ShaderProperty,
        desc: TemporaryTargetDesc,
    },

    /// Release a temporary render target
    ReleaseTemporaryTarget(ShaderProperty),

    /// Make a temporary target the active render target
    SetRenderTarget {
        id: ShaderProperty,
        load: LoadAction,
        store: StoreAction,
    },

    /// Restrict rendering to a sub-rectangle of the active target
    SetViewport(Rect),

    /// Override the view and projection matrices
    SetViewProjection { view: Mat4, projection: Mat4 },

    SetGlobalInt(ShaderProperty, i32),
    SetGlobalFloat(ShaderProperty, f32),
    SetGlobalVectorArray(ShaderProperty, Vec<Vec4>),
    SetGlobalMatrixArray(ShaderProperty, Vec<Mat4>),
}

/// Named list of recorded commands
#[derive(Clone, Debug, Default)]
pub struct CommandBuffer {
    name: String,
    commands: Vec<Command>,
}

impl CommandBuffer {
    /// Create an empty buffer
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    /// Buffer name, used as the default profiling sample name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the buffer
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Recorded commands in order
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop all recorded commands
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Take the recorded commands, leaving the buffer empty
    pub fn drain(&mut self) -> std::vec::Drain<'_, Command> {
        self.commands.drain(..)
    }

    pub fn begin_sample(&mut self, name: impl Into<String>) {
        self.commands.push(Command::BeginSample(name.into()));
    }

    pub fn end_sample(&mut self, name: impl Into<String>) {
        self.commands.push(Command::EndSample(name.into()));
    }

    pub fn clear_render_target(&mut self, depth: bool, color: bool, clear_color: Vec4) {
        self.commands.push(Command::ClearRenderTarget {
            depth,
            color,
            clear_color,
        });
    }

    pub fn get_temporary_target(&mut self, id: ShaderProperty, desc: TemporaryTargetDesc) {
        self.commands.push(Command::GetTemporaryTarget { id, desc });
    }

    pub fn release_temporary_target(&mut self, id: ShaderProperty) {
        self.commands.push(Command::ReleaseTemporaryTarget(id));
    }

    pub fn set_render_target(&mut self, id: ShaderProperty, load: LoadAction, store: StoreAction) {
        self.commands.push(Command::SetRenderTarget { id, load, store });
    }

    pub fn set_viewport(&mut self, rect: Rect) {
        self.commands.push(Command::SetViewport(rect));
    }

    pub fn set_view_projection(&mut self, view: Mat4, projection: Mat4) {
        self.commands.push(Command::SetViewProjection { view, projection });
    }

    pub fn set_global_int(&mut self, id: ShaderProperty, value: i32) {
        self.commands.push(Command::SetGlobalInt(id, value));
    }

    pub fn set_global_float(&mut self, id: ShaderProperty, value: f32) {
        self.commands.push(Command::SetGlobalFloat(id, value));
    }

    pub fn set_global_vector_array(&mut self, id: ShaderProperty, values: &[Vec4]) {
        self.commands.push(Command::SetGlobalVectorArray(id, values.to_vec()));
    }

    pub fn set_global_matrix_array(&mut self, id: ShaderProperty, values: &[Mat4]) {
        self.commands.push(Command::SetGlobalMatrixArray(id, values.to_vec()));
    }
}
