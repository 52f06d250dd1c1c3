use std::fmt;
use std::rc::Rc;
use crate::renderer::core::binding::BindingContext;
use crate::renderer::core::device::RenderDevice;

/// Shared handle to the driver and its bind slot registry.
///
/// Cloning is cheap. Resources keep a clone so they can talk to the driver and
/// delete their native object when dropped. The context is tied to the thread
/// that owns the graphics context and is deliberately not `Send`.
#[derive(Clone)]
pub struct RenderContext {
    inner: Rc<RenderContextInner>,
}

struct RenderContextInner {
    device: Box<dyn RenderDevice>,
    bindings: BindingContext,
}

impl RenderContext {
    pub fn new(device: impl RenderDevice + 'static) -> Self {
        Self {
            inner: Rc::new(RenderContextInner {
                device: Box::new(device),
                bindings: BindingContext::default(),
            }),
        }
    }

    pub fn device(&self) -> &dyn RenderDevice {
        self.inner.device.as_ref()
    }

    pub fn bindings(&self) -> &BindingContext {
        &self.inner.bindings
    }
}

impl fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("bindings", &self.inner.bindings)
            .finish_non_exhaustive()
    }
}
