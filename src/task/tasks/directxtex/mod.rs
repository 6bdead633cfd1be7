// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `DirectXTex` task.
//!
//! Tools and samples are switched off; only the library install tree is
//! needed by dependents.

use std::path::PathBuf;

use anyhow::Context;
use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::task::tools::cmake::{CmakeOperation, CmakeTool};
use crate::task::tools::downloader::DownloaderTool;
use crate::task::tools::extractor::ExtractorTool;
use crate::task::tools::msbuild::{MsbuildOperation, MsbuildTool};
use crate::task::{CleanFlags, TaskContext, Taskable};
use crate::utility::fs;

const NAME: &str = "directxtex";

/// Returns the task's source directory: `<build root>/directxtex-<v>`.
pub fn source_path(config: &Config) -> Result<PathBuf> {
    let build = config
        .paths
        .build
        .as_ref()
        .context("paths.build not configured")?;
    Ok(build.join(format!("{NAME}-{}", version(config)?)))
}

fn version(config: &Config) -> Result<String> {
    Ok(config.versions.get(NAME)?.to_string())
}

fn source_url(config: &Config) -> Result<String> {
    Ok(format!(
        "https://github.com/microsoft/DirectXTex/archive/refs/tags/{}.zip",
        version(config)?
    ))
}

fn cache_file(config: &Config) -> Result<PathBuf> {
    let cache = config
        .paths
        .cache
        .as_ref()
        .context("paths.cache not configured")?;
    Ok(cache.join(format!("{NAME}-{}.zip", version(config)?)))
}

fn downloader(config: &Config) -> Result<DownloaderTool> {
    Ok(DownloaderTool::new()
        .url(source_url(config)?)
        .file(cache_file(config)?))
}

fn cmake_tool(config: &Config, operation: CmakeOperation) -> Result<CmakeTool> {
    let src = source_path(config)?;
    let mut tool = CmakeTool::new()
        .root(&src)
        .prefix(src.join("build"))
        .def("BUILD_TOOLS", "OFF")
        .def("BUILD_SAMPLE", "OFF");
    if operation == CmakeOperation::Clean {
        tool = tool.clean_op();
    }
    Ok(tool)
}

fn solution_path(config: &Config) -> Result<PathBuf> {
    Ok(CmakeTool::build_path_for(&source_path(config)?).join("INSTALL.vcxproj"))
}

fn msbuild_tool(config: &Config, operation: MsbuildOperation) -> Result<MsbuildTool> {
    let mut tool = MsbuildTool::new().solution(solution_path(config)?);
    if operation == MsbuildOperation::Clean {
        tool = tool.clean_op();
    }
    Ok(tool)
}

/// Builds microsoft/DirectXTex from a tagged github archive.
#[derive(Debug, Clone, Default)]
pub struct DirectXTexTask;

impl DirectXTexTask {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Taskable for DirectXTexTask {
    fn name(&self) -> &'static str {
        NAME
    }

    fn do_clean(&self, ctx: &TaskContext, flags: CleanFlags) -> Result<()> {
        let config = ctx.config();

        if flags.contains(CleanFlags::REDOWNLOAD) {
            ctx.run_tool(&downloader(config)?.clean_op())?;
        }

        if flags.contains(CleanFlags::REEXTRACT) {
            let src = source_path(config)?;
            debug!(path = %src.display(), "deleting source directory");
            if !ctx.is_dry_run() {
                fs::delete_directory(&src)?;
            }
            return Ok(());
        }

        if flags.contains(CleanFlags::RECONFIGURE) {
            ctx.run_tool(&cmake_tool(config, CmakeOperation::Clean)?)?;
        }

        if flags.contains(CleanFlags::REBUILD) {
            ctx.run_tool(&msbuild_tool(config, MsbuildOperation::Clean)?)?;
        }

        Ok(())
    }

    fn do_fetch(&self, ctx: &TaskContext) -> Result<()> {
        let config = ctx.config();

        let file = ctx.run_tool(&downloader(config)?)?;

        ctx.run_tool(
            &ExtractorTool::new()
                .file(file)
                .output(source_path(config)?),
        )
    }

    fn do_build_and_install(&self, ctx: &TaskContext) -> Result<()> {
        let config = ctx.config();

        ctx.run_tool(&cmake_tool(config, CmakeOperation::Generate)?)?;
        ctx.run_tool(&msbuild_tool(config, MsbuildOperation::Build)?)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests;
