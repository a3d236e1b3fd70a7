//! Construction of the genpdf document a report is rendered into.

use std::cell::Cell;
use std::rc::Rc;

use genpdf::elements::Paragraph;
use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::{self, Style};
use genpdf::{self, Alignment, Element, Margins, Mm, PageDecorator, Position, Size};

#[cfg(feature = "hyphenation")]
use genpdf::hyphenation;

use crate::config::ReportConfig;
use crate::elements::{mm_from_f64, mm_to_f64};

const FOOTER_HEIGHT_MM: f64 = 8.0;
const FOOTER_FONT_SIZE: u8 = 9;

/// Page progress shared between the page decorator and the elements on the page.
///
/// The decorator runs before any element is placed on a new page, so elements that read the
/// tracker during rendering see the page they are being drawn on.
#[derive(Clone, Debug, Default)]
pub struct PageTracker {
    state: Rc<TrackerState>,
}

#[derive(Debug, Default)]
struct TrackerState {
    page: Cell<usize>,
    body_height_mm: Cell<Option<f64>>,
}

impl PageTracker {
    /// Creates a tracker that has not seen any page yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// One-based number of the page currently being laid out; zero before the first page.
    pub fn page(&self) -> usize {
        self.state.page.get()
    }

    /// Height of the text body of a fresh page, known once the first page was decorated.
    pub fn body_height(&self) -> Option<Mm> {
        self.state.body_height_mm.get().map(mm_from_f64)
    }

    fn start_page(&self) -> usize {
        let page = self.state.page.get() + 1;
        self.state.page.set(page);
        page
    }

    fn set_body_height(&self, height: Mm) {
        self.state.body_height_mm.set(Some(mm_to_f64(height)));
    }
}

/// Builder for `genpdf::Document` instances configured from a [`ReportConfig`].
#[derive(Default)]
pub struct DocumentBuilder {
    paper_size: Option<Size>,
    margins: Option<Margins>,
    title: Option<String>,
    font_size: Option<u8>,
    line_spacing: Option<f64>,
    footer: Option<FooterSpec>,
    tracker: PageTracker,
    #[cfg(feature = "hyphenation")]
    hyphenator: Option<hyphenation::Standard>,
}

type FooterFactory = dyn Fn(usize) -> Box<dyn Element>;

impl DocumentBuilder {
    /// Creates a new builder instance with genpdf's defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies paper, margins, typography, title and the page number footer of `config`.
    pub fn from_config(config: &ReportConfig) -> Self {
        let page = config.page();
        let (top, right, bottom, left) = page.margins_mm;
        let mut builder = Self::new()
            .with_paper_size(page.paper)
            .with_margins(Margins::trbl(
                mm_from_f64(top),
                mm_from_f64(right),
                mm_from_f64(bottom),
                mm_from_f64(left),
            ))
            .with_title(config.title())
            .with_font_size(config.typography().body_size)
            .with_line_spacing(config.typography().line_spacing);

        if page.page_numbers {
            builder = builder.with_footer(mm_from_f64(FOOTER_HEIGHT_MM), |page| {
                Paragraph::new(format!("Page {page}"))
                    .aligned(Alignment::Center)
                    .styled(Style::new().with_font_size(FOOTER_FONT_SIZE))
            });
        }
        builder
    }

    /// Sets the paper size used for newly created documents.
    pub fn with_paper_size(mut self, paper_size: impl Into<Size>) -> Self {
        self.paper_size = Some(paper_size.into());
        self
    }

    /// Sets the margins applied through the page decorator.
    pub fn with_margins(mut self, margins: impl Into<Margins>) -> Self {
        self.margins = Some(margins.into());
        self
    }

    /// Sets the title stored in the document metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the default font size in points.
    pub fn with_font_size(mut self, font_size: u8) -> Self {
        self.font_size = Some(font_size);
        self
    }

    /// Sets the line spacing factor.
    pub fn with_line_spacing(mut self, line_spacing: f64) -> Self {
        self.line_spacing = Some(line_spacing);
        self
    }

    /// Shares `tracker` with the page decorator.
    pub fn with_tracker(mut self, tracker: PageTracker) -> Self {
        self.tracker = tracker;
        self
    }

    /// Configures a footer callback with a fixed height that is invoked for every page.
    pub fn with_footer<F, E>(mut self, height: impl Into<Mm>, footer: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        self.footer = Some(FooterSpec::new(height, footer));
        self
    }

    /// Enables hyphenation using the provided hyphenation dictionary.
    #[cfg(feature = "hyphenation")]
    pub fn with_hyphenator(mut self, hyphenator: hyphenation::Standard) -> Self {
        self.hyphenator = Some(hyphenator);
        self
    }

    /// Builds the document around the given font family.
    pub fn build(self, font_family: FontFamily<FontData>) -> genpdf::Document {
        let mut document = genpdf::Document::new(font_family);

        if let Some(paper_size) = self.paper_size {
            document.set_paper_size(paper_size);
        }
        if let Some(title) = self.title {
            document.set_title(title);
        }
        if let Some(font_size) = self.font_size {
            document.set_font_size(font_size);
        }
        if let Some(line_spacing) = self.line_spacing {
            document.set_line_spacing(line_spacing);
        }

        let decorator = ConfiguredPageDecorator {
            tracker: self.tracker,
            margins: self.margins,
            footer: self.footer,
        };
        document.set_page_decorator(decorator);

        #[cfg(feature = "hyphenation")]
        if let Some(hyphenator) = self.hyphenator {
            document.set_hyphenator(hyphenator);
        }

        document
    }
}

/// Definition of a footer rendered through the page decorator.
pub struct FooterSpec {
    height: Mm,
    factory: Box<FooterFactory>,
}

impl FooterSpec {
    /// Creates a new footer specification.
    pub fn new<F, E>(height: impl Into<Mm>, factory: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        Self {
            height: height.into(),
            factory: Box::new(move |page| Box::new(factory(page)) as Box<dyn Element>),
        }
    }
}

struct ConfiguredPageDecorator {
    tracker: PageTracker,
    margins: Option<Margins>,
    footer: Option<FooterSpec>,
}

impl PageDecorator for ConfiguredPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: style::Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        let page = self.tracker.start_page();

        if let Some(margins) = self.margins {
            area.add_margins(margins);
        }

        if let Some(footer) = &self.footer {
            let available = area.size().height;
            if footer.height > available {
                return Err(Error::new(
                    "Footer height exceeds available space",
                    ErrorKind::InvalidData,
                ));
            }

            let mut footer_area = area.clone();
            footer_area.add_offset(Position::new(0, available - footer.height));
            let mut element = (footer.factory)(page);
            let result = element.render(context, footer_area, style)?;
            if result.has_more {
                return Err(Error::new(
                    "Footer element does not fit into the reserved space",
                    ErrorKind::PageSizeExceeded,
                ));
            }

            area.set_height(available - footer.height);
        }

        self.tracker.set_body_height(area.size().height);
        Ok(area)
    }
}
