//! Login page object.

use crate::driver::Driver;
use crate::locator::Locator;
use crate::page::Page;
use crate::result::NavegarResult;

/// Page object for a username/password login form
#[derive(Debug)]
pub struct LoginPage<D: Driver> {
    page: Page<D>,
    base_url: String,
    username: Locator,
    password: Locator,
    submit: Locator,
    content_links: Locator,
}

impl<D: Driver> LoginPage<D> {
    /// Bind the page object to a page and the application URL
    pub fn new(page: Page<D>, base_url: impl Into<String>) -> Self {
        Self {
            page,
            base_url: base_url.into(),
            username: Locator::id("username"),
            password: Locator::id("password"),
            submit: Locator::css("button[type='submit']"),
            content_links: Locator::xpath("//div[@class='et_pb_text_inner']//li/a"),
        }
    }

    /// Open the login page
    pub fn navigate(&mut self) -> NavegarResult<()> {
        let url = self.base_url.clone();
        self.page.open(&url)
    }

    /// Fill both credential fields and submit
    pub fn login(&mut self, username: &str, password: &str) -> NavegarResult<()> {
        self.page.fill(&self.username, username)?;
        self.page.fill(&self.password, password)?;
        self.page.click(&self.submit)
    }

    /// Texts of the content links shown after login
    pub fn link_texts(&self) -> NavegarResult<Vec<String>> {
        self.page.get_all_text(&self.content_links)
    }

    /// The underlying page
    pub fn page(&mut self) -> &mut Page<D> {
        &mut self.page
    }

    /// Unwrap the underlying page
    pub fn into_page(self) -> Page<D> {
        self.page
    }
}
