use netrun_common::Result;
use netrun_common::plugin::{PluginModule, PluginRoot};

pub mod inline;
pub mod yaml;

pub use inline::InlineSource;
pub use yaml::YamlSource;

pub const ROOT: &str = "netrun.sources";

pub fn root() -> Result<PluginRoot> {
    Ok(PluginRoot::new(ROOT)
        .with_module(PluginModule::new("netrun.sources.yaml", yaml::descriptors))
        .with_module(PluginModule::new("netrun.sources.inline", inline::descriptors)))
}
