//! Compiled component definitions.

use std::sync::Arc;

use lumen_compiler::{CompiledComponent, Style};
use lumen_ir::Type;
use lumen_runtime::PlatformError;

use crate::ComponentInstance;

/// An immutable, compiled component.
///
/// Cheap to clone and safe to share between threads. Instances are created
/// on the thread that calls [`create`](Self::create).
#[derive(Clone, Debug)]
pub struct ComponentDefinition {
    inner: Arc<CompiledComponent>,
    style: Style,
}

impl ComponentDefinition {
    pub(crate) fn new(inner: Arc<CompiledComponent>, style: Style) -> Self {
        ComponentDefinition { inner, style }
    }

    /// The component name as declared.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The style the definition was compiled with.
    pub fn style(&self) -> Style {
        self.style
    }

    /// Public properties and their types, in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, Type)> {
        self.inner
            .public_properties()
            .map(|(_, property)| (property.name.as_str(), property.ty))
    }

    /// Callbacks and their parameter types, in declaration order.
    pub fn callbacks(&self) -> impl Iterator<Item = (&str, &[Type])> {
        self.inner
            .public_callbacks()
            .map(|(_, callback)| (callback.name.as_str(), callback.params.as_slice()))
    }

    /// Create a new instance with its own state and window.
    pub fn create(&self) -> Result<ComponentInstance, PlatformError> {
        ComponentInstance::new(self.clone())
    }

    pub(crate) fn component(&self) -> &Arc<CompiledComponent> {
        &self.inner
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ComponentCompiler;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn definition(source: &str) -> ComponentDefinition {
        ComponentCompiler::new()
            .build_from_source(source, Path::new(""))
            .unwrap()
            .definition
    }

    #[test]
    fn test_definitions_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ComponentDefinition>();
    }

    #[test]
    fn test_interface_listing() {
        let definition = definition(
            "export component Form {
                in property <string> title;
                out property <bool> valid;
                private property <int> hidden;
                callback submit(string, int);
                Rectangle {}
            }",
        );
        assert_eq!(
            definition.properties().collect::<Vec<_>>(),
            vec![("title", Type::String), ("valid", Type::Bool)]
        );
        assert_eq!(
            definition.callbacks().collect::<Vec<_>>(),
            vec![("submit", [Type::String, Type::Int].as_slice())]
        );
    }

    #[test]
    fn test_name_is_kept_as_written() {
        assert_eq!(definition("export component my_Widget {}").name(), "my_Widget");
    }
}
