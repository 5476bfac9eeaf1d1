//! AWS CloudFormation deployment guide.
//!
//! The guide walks through three steps: an introduction, region selection,
//! and deployment. The only state is the selected region. It is substituted
//! into the AWS console deep links that open the stack creation page for
//! the cloud scanner template.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::error::Error;
use crate::validation::{check_http_url, Validate, ValidationError, ValidationErrors};

/// Documentation page for CloudFormation based deployment.
pub const DOCS_URL: &str =
    "https://community.deepfence.io/threatmapper/docs/v2.0/cloudscanner/aws#cloudformation";

/// Default bucket holding the cloud scanner templates.
pub const DEFAULT_TEMPLATE_BASE_URL: &str = "https://deepfence-public.s3.amazonaws.com/cloud-scanner";

/// Default stack name for created stacks.
pub const DEFAULT_STACK_NAME: &str = "Deepfence-Cloud-Scanner";

/// Default cloud scanner image passed as a stack parameter.
pub const DEFAULT_SCANNER_IMAGE: &str = "quay.io/deepfenceio/cloud-scanner:2.0.0";

const SINGLE_ACCOUNT_TEMPLATE: &str = "deepfence-cloud-scanner.template";
const ORGANIZATION_TEMPLATE: &str = "deepfence-cloud-scanner-org-common.template";

macro_rules! aws_regions {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// AWS regions offered by the deployment guide.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum AwsRegion {
            $(
                #[doc = $name]
                #[serde(rename = $name)]
                $variant,
            )+
        }

        impl AwsRegion {
            /// Every selectable region, in display order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the region code, e.g. `us-east-1`.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }
    };
}

aws_regions! {
    UsEast1 => "us-east-1",
    UsEast2 => "us-east-2",
    UsWest1 => "us-west-1",
    UsWest2 => "us-west-2",
    AfSouth1 => "af-south-1",
    ApEast1 => "ap-east-1",
    ApSouth1 => "ap-south-1",
    ApNortheast1 => "ap-northeast-1",
    ApNortheast2 => "ap-northeast-2",
    ApNortheast3 => "ap-northeast-3",
    ApSoutheast1 => "ap-southeast-1",
    ApSoutheast2 => "ap-southeast-2",
    ApSoutheast3 => "ap-southeast-3",
    CaCentral1 => "ca-central-1",
    EuCentral1 => "eu-central-1",
    EuWest1 => "eu-west-1",
    EuWest2 => "eu-west-2",
    EuWest3 => "eu-west-3",
    EuSouth1 => "eu-south-1",
    EuNorth1 => "eu-north-1",
    MeSouth1 => "me-south-1",
    MeCentral1 => "me-central-1",
    SaEast1 => "sa-east-1",
    UsGovEast1 => "us-gov-east-1",
    UsGovWest1 => "us-gov-west-1",
}

impl Default for AwsRegion {
    fn default() -> Self {
        Self::UsEast1
    }
}

impl fmt::Display for AwsRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AwsRegion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| Error::InvalidRegion {
                region: s.to_string(),
            })
    }
}

/// Where templates come from and how stacks are parameterized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSource {
    /// Base URL of the template bucket, without a trailing slash.
    pub base_url: String,
    /// Stack name prefilled in the console.
    pub stack_name: String,
    /// Cloud scanner image passed as `CloudScannerImage`.
    pub scanner_image: String,
}

impl Default for TemplateSource {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_TEMPLATE_BASE_URL.to_string(),
            stack_name: DEFAULT_STACK_NAME.to_string(),
            scanner_image: DEFAULT_SCANNER_IMAGE.to_string(),
        }
    }
}

impl TemplateSource {
    /// Overrides the scanner image.
    #[must_use]
    pub fn with_scanner_image(mut self, image: impl Into<String>) -> Self {
        self.scanner_image = image.into();
        self
    }

    /// Overrides the template bucket base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn template_url(&self, file: &str) -> String {
        format!("{}/{file}", self.base_url)
    }
}

impl Validate for TemplateSource {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_http_url(&mut errors, "base_url", &self.base_url);
        if self.stack_name.trim().is_empty() {
            errors.add(ValidationError::empty("stack_name"));
        }
        if self.scanner_image.trim().is_empty() {
            errors.add(ValidationError::empty("scanner_image"));
        }

        errors.into_result()
    }
}

/// One step of the deployment guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardStep {
    /// Position in the guide, starting at zero for the introduction.
    pub index: usize,
    /// Step title.
    pub title: &'static str,
    /// Step body text.
    pub description: &'static str,
}

/// All outbound links of the deploy step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployLinks {
    /// Region the console links point at.
    pub region: AwsRegion,
    /// Console link creating a stack for a single account.
    pub single_account: String,
    /// Raw single account template.
    pub single_account_template: String,
    /// Console link creating a stack for an AWS Organization.
    pub organization: String,
    /// Raw organization template.
    pub organization_template: String,
}

/// State of the CloudFormation deployment guide.
///
/// # Examples
///
/// ```
/// use fenceline_core::cloudformation::{AwsRegion, CloudFormationWizard};
///
/// let mut wizard = CloudFormationWizard::new();
/// assert_eq!(wizard.region(), AwsRegion::UsEast1);
///
/// wizard.select_region(AwsRegion::EuWest2);
/// assert!(wizard.single_account_deploy_url().starts_with("https://eu-west-2.console.aws.amazon.com/"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloudFormationWizard {
    region: AwsRegion,
    templates: TemplateSource,
}

impl CloudFormationWizard {
    /// Creates a guide with the default region and templates.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a guide using custom template settings.
    #[must_use]
    pub fn with_templates(templates: TemplateSource) -> Self {
        Self {
            region: AwsRegion::default(),
            templates,
        }
    }

    /// Currently selected region.
    #[must_use]
    pub const fn region(&self) -> AwsRegion {
        self.region
    }

    /// Replaces the selected region.
    pub fn select_region(&mut self, region: AwsRegion) {
        self.region = region;
    }

    /// Template settings in use.
    #[must_use]
    pub const fn templates(&self) -> &TemplateSource {
        &self.templates
    }

    /// The three steps of the guide.
    #[must_use]
    pub const fn steps(&self) -> [WizardStep; 3] {
        [
            WizardStep {
                index: 0,
                title: "Cloud Formation",
                description: "Connect to your AWS Cloud Account via Cloud Formation.",
            },
            WizardStep {
                index: 1,
                title: "Region Selection",
                description: "Select the region the stack is created in.",
            },
            WizardStep {
                index: 2,
                title: "Deploy",
                description: "Deploy all modules for the posture scanner for a single account \
                              or for every account of an AWS Organization.",
            },
        ]
    }

    /// Raw single account template URL.
    #[must_use]
    pub fn single_account_template_url(&self) -> String {
        self.templates.template_url(SINGLE_ACCOUNT_TEMPLATE)
    }

    /// Raw organization template URL.
    #[must_use]
    pub fn organization_template_url(&self) -> String {
        self.templates.template_url(ORGANIZATION_TEMPLATE)
    }

    /// Console link that creates the single account stack in the selected region.
    #[must_use]
    pub fn single_account_deploy_url(&self) -> String {
        self.console_url(&self.single_account_template_url())
    }

    /// Console link that creates the organization stack in the selected region.
    #[must_use]
    pub fn organization_deploy_url(&self) -> String {
        self.console_url(&self.organization_template_url())
    }

    /// All links shown in the deploy step.
    #[must_use]
    pub fn deploy_links(&self) -> DeployLinks {
        DeployLinks {
            region: self.region,
            single_account: self.single_account_deploy_url(),
            single_account_template: self.single_account_template_url(),
            organization: self.organization_deploy_url(),
            organization_template: self.organization_template_url(),
        }
    }

    fn console_url(&self, template_url: &str) -> String {
        let region = self.region.as_str();
        format!(
            "https://{region}.console.aws.amazon.com/cloudformation/home?region={region}\
             #/stacks/create/review?templateURL={template_url}\
             &stackName={}&param_CloudScannerImage={}",
            query_value(&self.templates.stack_name),
            query_value(&self.templates.scanner_image),
        )
    }
}

/// Encodes a stack parameter for the console link.
///
/// Image references and stack names made only of URL-safe characters are
/// left readable; anything else is form-encoded.
fn query_value(value: &str) -> Cow<'_, str> {
    let readable = value
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b"-._~/:@".contains(&b));
    if readable {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(form_urlencoded::byte_serialize(value.as_bytes()).collect())
    }
}
