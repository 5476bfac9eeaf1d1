//! CloudFormation command implementation.
//!
//! Prints the AWS regions the deploy guide offers and the console links
//! that create the cloud scanner stack.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tracing::info;

use fenceline_core::cloudformation::DOCS_URL;
use fenceline_core::{AwsRegion, CloudFormationWizard, DeployLinks, TemplateSource, Validate};

use super::OutputFormat;

/// Arguments for the cloudformation command.
#[derive(Args)]
pub struct CloudFormationArgs {
    #[command(subcommand)]
    pub command: CloudFormationCommand,
}

/// CloudFormation subcommands.
#[derive(Subcommand)]
pub enum CloudFormationCommand {
    /// List selectable AWS regions
    Regions,

    /// Print the deploy links for a region
    Links(LinksArgs),
}

/// Arguments for `cloudformation links`.
#[derive(Args)]
pub struct LinksArgs {
    /// AWS region the stack is created in
    #[arg(short, long, default_value_t = AwsRegion::default())]
    pub region: AwsRegion,

    /// Cloud scanner image passed to the stack
    #[arg(long, env = "FENCELINE_SCANNER_IMAGE")]
    pub scanner_image: Option<String>,

    /// Base URL of the template bucket
    #[arg(long)]
    pub template_base_url: Option<String>,

    /// Stack name prefilled in the AWS console
    #[arg(long)]
    pub stack_name: Option<String>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub output: OutputFormat,
}

/// Runs the cloudformation command.
///
/// # Errors
///
/// Returns an error if the template settings are invalid.
pub fn run(args: &CloudFormationArgs) -> Result<()> {
    match &args.command {
        CloudFormationCommand::Regions => {
            list_regions();
            Ok(())
        }
        CloudFormationCommand::Links(args) => links(args),
    }
}

fn list_regions() {
    let default = AwsRegion::default();
    for region in AwsRegion::ALL {
        if *region == default {
            println!("* {region} (default)");
        } else {
            println!("  {region}");
        }
    }
}

fn template_source(args: &LinksArgs) -> Result<TemplateSource> {
    let mut templates = TemplateSource::default();
    if let Some(ref image) = args.scanner_image {
        templates = templates.with_scanner_image(image);
    }
    if let Some(ref base_url) = args.template_base_url {
        templates = templates.with_base_url(base_url);
    }
    if let Some(ref stack_name) = args.stack_name {
        templates.stack_name.clone_from(stack_name);
    }

    templates.validate().context("Invalid template settings")?;
    Ok(templates)
}

fn links(args: &LinksArgs) -> Result<()> {
    let mut wizard = CloudFormationWizard::with_templates(template_source(args)?);
    wizard.select_region(args.region);
    info!(region = %args.region, "Building deploy links");

    let links = wizard.deploy_links();
    match args.output {
        OutputFormat::Text => print_text_links(&wizard, &links),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&links)?),
    }
    Ok(())
}

fn print_text_links(wizard: &CloudFormationWizard, links: &DeployLinks) {
    for step in wizard.steps() {
        println!("{}. {}", step.index + 1, step.title);
        println!("   {}", step.description);
    }
    println!();
    println!("Region: {}", links.region);
    println!();
    println!("Single account");
    println!("  Deploy:   {}", links.single_account);
    println!("  Template: {}", links.single_account_template);
    println!();
    println!("AWS Organization");
    println!("  Deploy:   {}", links.organization);
    println!("  Template: {}", links.organization_template);
    println!();
    println!("Docs: {DOCS_URL}");
}
