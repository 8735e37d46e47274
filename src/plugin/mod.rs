//! Plugins register collectors with an [`ImportFinder`].
//!
//! Activation goes through [`PluginApi`], which decides how a collector is
//! registered: in dev mode every collector is wrapped in a
//! [`CachedImportCollector`] sharing the API's [`ImportCache`].

use std::sync::Arc;

use crate::cache::{CachedImportCollector, ImportCache};
use crate::config::ResolverConfig;
use crate::import::{ImportCollector, ImportFinder, ScriptImportCollector, StylesheetImportCollector};

/// Handle passed to [`Plugin::activate`].
pub struct PluginApi<'a> {
    finder: &'a mut ImportFinder,
    config: &'a ResolverConfig,
    cache: Arc<ImportCache>,
}

impl<'a> PluginApi<'a> {
    pub fn new(
        finder: &'a mut ImportFinder,
        config: &'a ResolverConfig,
        cache: Arc<ImportCache>,
    ) -> Self {
        Self {
            finder,
            config,
            cache,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        self.config
    }

    pub fn cache(&self) -> &Arc<ImportCache> {
        &self.cache
    }

    /// Register `collector`, cache-wrapped in dev mode.
    pub fn add_collector<C: ImportCollector + 'static>(&mut self, collector: C) {
        if self.config.dev {
            let cached = CachedImportCollector::new(collector, Arc::clone(&self.cache));
            self.finder.add_collector(Box::new(cached));
        } else {
            self.finder.add_collector(Box::new(collector));
        }
    }
}

/// A unit of collector registration.
pub trait Plugin {
    fn name(&self) -> &'static str;

    fn activate(&self, api: &mut PluginApi<'_>);
}

/// Registers the LESS stylesheet collector.
#[derive(Debug, Default, Clone, Copy)]
pub struct LessPlugin;

impl Plugin for LessPlugin {
    fn name(&self) -> &'static str {
        "less"
    }

    fn activate(&self, api: &mut PluginApi<'_>) {
        let dialect = api.config().less.dialect();
        api.add_collector(StylesheetImportCollector::new(dialect));
    }
}

/// Registers the JavaScript and TypeScript collectors enabled in `[script]`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptPlugin;

impl Plugin for ScriptPlugin {
    fn name(&self) -> &'static str {
        "script"
    }

    fn activate(&self, api: &mut PluginApi<'_>) {
        let script = api.config().script.clone();
        if script.javascript {
            api.add_collector(ScriptImportCollector::javascript());
        }
        if script.typescript {
            api.add_collector(ScriptImportCollector::typescript());
        }
    }
}

/// Built-in plugins, in registration order.
pub fn builtin() -> Vec<Box<dyn Plugin>> {
    vec![Box::new(LessPlugin), Box::new(ScriptPlugin)]
}

/// Activate every built-in plugin on `finder`.
pub fn activate_builtin(finder: &mut ImportFinder, config: &ResolverConfig, cache: Arc<ImportCache>) {
    let mut api = PluginApi::new(finder, config, cache);
    for plugin in builtin() {
        crate::debug!("plugin"; "activating {}", plugin.name());
        plugin.activate(&mut api);
    }
}
