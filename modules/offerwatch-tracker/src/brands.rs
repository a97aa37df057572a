//! Monitored brand configuration for the Japan region.
//!
//! One entry per hotel company: display name, source page, and the prompt
//! template handed to the extraction service. The templates are data — the
//! pipeline itself never branches on which brand it is processing.

/// Builds the extraction prompt from (normalized page stream, source URL).
pub type PromptFn = fn(&str, &str) -> String;

pub struct BrandConfig {
    pub key: &'static str,
    pub name: &'static str,
    pub url: &'static str,
    pub prompt: PromptFn,
}

/// All monitored brands, in the fixed order runs process them.
pub fn brand_configs() -> Vec<BrandConfig> {
    vec![
        BrandConfig {
            key: "marriott",
            name: "Marriott",
            url: "https://www.marriott.com/ja/offers.mi",
            prompt: marriott_prompt,
        },
        BrandConfig {
            key: "ihg",
            name: "IHG",
            url: "https://www.ihg.com/content/jp/ja/offers",
            prompt: ihg_prompt,
        },
        BrandConfig {
            key: "hyatt",
            name: "Hyatt",
            url: "https://www.hyatt.com/loyalty/ja-JP",
            prompt: hyatt_prompt,
        },
        BrandConfig {
            key: "accor",
            name: "Accor",
            url: "https://all.accor.com/a/ja/deals-corner.html",
            prompt: accor_prompt,
        },
        BrandConfig {
            key: "hilton",
            name: "Hilton",
            url: "https://www.hilton.com/ja/",
            prompt: hilton_prompt,
        },
    ]
}

/// Schema and translation rules shared by every brand prompt.
const RESPONSE_RULES: &str = r#"IMPORTANT: If it's a primary visual slide/hero banner, set "isBanner": true.
IMPORTANT: TRANSLATE ALL EXTRACTED TEXT (name, info, category) INTO ENGLISH.
Respond ONLY with a JSON array: [{"name": "...", "info": "...", "category": "...", "isBanner": boolean}]"#;

fn marriott_prompt(page_text: &str, url: &str) -> String {
    format!(
        r#"CAMPAIGN INTEL EXTRACTION: Marriott Japan Offers
URL: {url}
STREAM: {page_text}
TASK: Identify and extract all current marketing campaigns and HIGH-IMPACT HERO BANNERS.
PRIORITY TARGETS: Look for seasonal Japan themes, Member Exclusives, and Flagship promotions.
{RESPONSE_RULES}"#
    )
}

fn ihg_prompt(page_text: &str, url: &str) -> String {
    format!(
        r#"CAMPAIGN INTEL EXTRACTION: IHG Japan Offers
URL: {url}
STREAM: {page_text}
TASK: Deep scan for high-impact Visual Hero Banners and Promotional Seasonal Campaigns in Japan.
{RESPONSE_RULES}"#
    )
}

fn hyatt_prompt(page_text: &str, url: &str) -> String {
    format!(
        r#"CAMPAIGN INTEL EXTRACTION: Hyatt Japan Loyalty
URL: {url}
STREAM: {page_text}
TASK: Extract active promotional offers and limited time member deals for Japan.
SPECIFIC PRIORITY: Identify high-impact Hero Banners like "TO A NEW ADVENTURE" and point-earning promotions (e.g., 5 Base Points, free nights from 3,500 points).
{RESPONSE_RULES}"#
    )
}

fn accor_prompt(page_text: &str, url: &str) -> String {
    format!(
        r#"CAMPAIGN INTEL EXTRACTION: Accor ALL Japan Deals Corner
URL: {url}
STREAM: {page_text}
TASK: Identify tactical promotions, seasonal offers, and ALL member exclusives in the Japan market.
{RESPONSE_RULES}"#
    )
}

fn hilton_prompt(page_text: &str, url: &str) -> String {
    format!(
        r#"CAMPAIGN INTEL EXTRACTION: Hilton Japan Regional
URL: {url}
STREAM: {page_text}
TASK: Extract active promotional assets and marketing messaging for Hilton's Japan presence.
SPECIFIC TARGETS: Look for "Points Unlimited", Hilton Honors member deals, and seasonal Japan vacation offers.
{RESPONSE_RULES}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_brands_in_fixed_order() {
        let brands = brand_configs();
        let names: Vec<_> = brands.iter().map(|b| b.name).collect();
        assert_eq!(names, ["Marriott", "IHG", "Hyatt", "Accor", "Hilton"]);
    }

    #[test]
    fn prompts_embed_stream_and_url() {
        for brand in brand_configs() {
            let prompt = (brand.prompt)("PAGE_STREAM_MARKER", brand.url);
            assert!(prompt.contains("PAGE_STREAM_MARKER"), "{} prompt missing stream", brand.name);
            assert!(prompt.contains(brand.url), "{} prompt missing URL", brand.name);
            assert!(prompt.contains("JSON array"), "{} prompt missing schema", brand.name);
            assert!(prompt.contains("isBanner"), "{} prompt missing banner flag", brand.name);
        }
    }
}
